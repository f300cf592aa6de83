use log::warn;

use verdant_serde::{ByteReader, ByteWriter, BYTE_SIZE, FLOAT_SIZE, INT_SIZE, SHORT_SIZE};

use crate::types::{EntityTypeId, Phase};

use super::error::MessageError;

/// The configuration tuple carried by a `Planted` broadcast: everything a
/// peer needs to reproduce a growing plant from scratch. The epoch
/// timestamp is replicated verbatim, never recomputed, so peers with clock
/// drift still agree on growth completion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantConfig {
    pub type_id: EntityTypeId,
    pub planted_epoch_seconds: i64,
    pub grow_duration_seconds: f32,
    pub max_scale: f32,
    pub scale_multiplier: f32,
}

/// One row of a balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub player_id: String,
    pub display_name: String,
    pub balance: i32,
}

/// Wire discriminant for each message shape. The transport prepends this
/// byte; payload layout is implicit in the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Planted,
    Harvested,
    Enable,
    Disable,
    Sold,
    StateSync,
    BalanceSnapshot,
}

impl MessageKind {
    pub fn to_u8(self) -> u8 {
        match self {
            MessageKind::Planted => 0,
            MessageKind::Harvested => 1,
            MessageKind::Enable => 2,
            MessageKind::Disable => 3,
            MessageKind::Sold => 4,
            MessageKind::StateSync => 5,
            MessageKind::BalanceSnapshot => 6,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, MessageError> {
        match value {
            0 => Ok(MessageKind::Planted),
            1 => Ok(MessageKind::Harvested),
            2 => Ok(MessageKind::Enable),
            3 => Ok(MessageKind::Disable),
            4 => Ok(MessageKind::Sold),
            5 => Ok(MessageKind::StateSync),
            6 => Ok(MessageKind::BalanceSnapshot),
            _ => Err(MessageError::UnknownKind { kind: value }),
        }
    }
}

/// Every message this system puts on the wire, decoded once into a typed
/// value before dispatch.
///
/// `Harvested` doubles as the occupancy-cleared notice for a slot: all
/// peers release the slot in lockstep when they receive it.
#[derive(Debug, Clone, PartialEq)]
pub enum GardenMessage {
    Planted(PlantConfig),
    Harvested,
    Enable,
    Disable,
    Sold,
    StateSync {
        phase: Phase,
        planted_epoch_seconds: i64,
    },
    BalanceSnapshot {
        entries: Vec<BalanceEntry>,
    },
}

impl GardenMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            GardenMessage::Planted(_) => MessageKind::Planted,
            GardenMessage::Harvested => MessageKind::Harvested,
            GardenMessage::Enable => MessageKind::Enable,
            GardenMessage::Disable => MessageKind::Disable,
            GardenMessage::Sold => MessageKind::Sold,
            GardenMessage::StateSync { .. } => MessageKind::StateSync,
            GardenMessage::BalanceSnapshot { .. } => MessageKind::BalanceSnapshot,
        }
    }

    /// Payload bytes only; the transport prepends `kind().to_u8()`.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            GardenMessage::Planted(config) => {
                let mut writer = ByteWriter::with_capacity(
                    SHORT_SIZE + config.type_id.as_str().len() + 2 * INT_SIZE + 3 * FLOAT_SIZE,
                );
                writer.add_string(config.type_id.as_str());
                add_i64(&mut writer, config.planted_epoch_seconds);
                writer.add_f32(config.grow_duration_seconds);
                writer.add_f32(config.max_scale);
                writer.add_f32(config.scale_multiplier);
                writer.to_bytes()
            }
            GardenMessage::Harvested
            | GardenMessage::Enable
            | GardenMessage::Disable
            | GardenMessage::Sold => Vec::new(),
            GardenMessage::StateSync {
                phase,
                planted_epoch_seconds,
            } => {
                let mut writer = ByteWriter::with_capacity(BYTE_SIZE + 2 * INT_SIZE);
                writer.add_u8(phase.to_u8());
                add_i64(&mut writer, *planted_epoch_seconds);
                writer.to_bytes()
            }
            GardenMessage::BalanceSnapshot { entries } => {
                let mut entries = entries.as_slice();
                if entries.len() > u8::MAX as usize {
                    warn!(
                        "balance snapshot holds {} entries, capping at {}",
                        entries.len(),
                        u8::MAX
                    );
                    entries = &entries[..u8::MAX as usize];
                }
                let mut size = BYTE_SIZE;
                for entry in entries {
                    size += SHORT_SIZE + entry.player_id.len();
                    size += SHORT_SIZE + entry.display_name.len();
                    size += INT_SIZE;
                }
                let mut writer = ByteWriter::with_capacity(size);
                writer.add_u8(entries.len() as u8);
                for entry in entries {
                    writer.add_string(&entry.player_id);
                    writer.add_string(&entry.display_name);
                    writer.add_i32(entry.balance);
                }
                writer.to_bytes()
            }
        }
    }

    /// Decodes a payload received for the given discriminant byte.
    ///
    /// A payload that runs out of bytes has already degraded to zero values
    /// inside the reader; the validity latch turns that into
    /// `MessageError::Truncated` here so callers can log and drop it.
    pub fn decode(kind: u8, payload: &[u8]) -> Result<Self, MessageError> {
        let kind = MessageKind::from_u8(kind)?;
        match kind {
            MessageKind::Planted => {
                let mut reader = ByteReader::new(payload);
                let type_id = EntityTypeId::from(reader.next_string());
                let planted_epoch_seconds = next_i64(&mut reader);
                let grow_duration_seconds = reader.next_f32();
                let max_scale = reader.next_f32();
                let scale_multiplier = reader.next_f32();
                if !reader.is_valid() {
                    return Err(MessageError::Truncated { kind });
                }
                Ok(GardenMessage::Planted(PlantConfig {
                    type_id,
                    planted_epoch_seconds,
                    grow_duration_seconds,
                    max_scale,
                    scale_multiplier,
                }))
            }
            MessageKind::Harvested => Ok(GardenMessage::Harvested),
            MessageKind::Enable => Ok(GardenMessage::Enable),
            MessageKind::Disable => Ok(GardenMessage::Disable),
            MessageKind::Sold => Ok(GardenMessage::Sold),
            MessageKind::StateSync => {
                let mut reader = ByteReader::new(payload);
                let phase_flag = reader.next_u8();
                let planted_epoch_seconds = next_i64(&mut reader);
                if !reader.is_valid() {
                    return Err(MessageError::Truncated { kind });
                }
                let phase = Phase::from_u8(phase_flag)
                    .ok_or(MessageError::UnknownPhase { value: phase_flag })?;
                Ok(GardenMessage::StateSync {
                    phase,
                    planted_epoch_seconds,
                })
            }
            MessageKind::BalanceSnapshot => {
                let mut reader = ByteReader::new(payload);
                let count = reader.next_u8() as usize;
                let mut entries = Vec::with_capacity(count);
                for _ in 0..count {
                    let player_id = reader.next_string();
                    let display_name = reader.next_string();
                    let balance = reader.next_i32();
                    entries.push(BalanceEntry {
                        player_id,
                        display_name,
                        balance,
                    });
                }
                if !reader.is_valid() {
                    return Err(MessageError::Truncated { kind });
                }
                Ok(GardenMessage::BalanceSnapshot { entries })
            }
        }
    }
}

// i64 values cross the wire as two i32 halves, high then low.

fn add_i64(writer: &mut ByteWriter, value: i64) {
    writer.add_i32((value >> 32) as i32);
    writer.add_i32(value as i32);
}

fn next_i64(reader: &mut ByteReader) -> i64 {
    let high = reader.next_i32() as i64;
    let low = reader.next_i32() as u32 as i64;
    (high << 32) | low
}
