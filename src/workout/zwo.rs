use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::Error;

use super::model::{Workout, WorkoutBlock};

/// Parse a `.zwo` workout file from disk.
pub fn parse_file(path: &Path) -> Result<Workout, Error> {
    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse a `.zwo` workout document.
///
/// Recognized block elements: `Warmup`, `SteadyState`, `Cooldown`,
/// `IntervalsT`, `Ramp`, `FreeRide`. An `IntervalsT` collapses to a single
/// block of `Repeat * (OnDuration + OffDuration)` seconds. Unknown
/// elements and block children (text events, power targets) are skipped.
pub fn parse_str(xml: &str) -> Result<Workout, Error> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut name = String::new();
    let mut author = String::new();
    let mut description = String::new();
    let mut blocks: Vec<WorkoutBlock> = Vec::new();

    let mut seen_root = false;
    let mut in_workout = false;
    // Metadata element whose text content we are currently collecting.
    let mut text_target: Option<u8> = None;
    // Nesting depth inside a block element whose children we skip.
    let mut skip_depth: usize = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    match e.name().as_ref() {
                        b"workout_file" => seen_root = true,
                        b"workout" => in_workout = true,
                        b"author" if !in_workout => text_target = Some(b'a'),
                        b"name" if !in_workout => text_target = Some(b'n'),
                        b"description" if !in_workout => text_target = Some(b'd'),
                        tag if in_workout => {
                            if let Some(block) = parse_block(tag, &e)? {
                                blocks.push(block);
                            }
                            skip_depth = 1;
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(e) => {
                if skip_depth == 0 && in_workout {
                    if let Some(block) = parse_block(e.name().as_ref(), &e)? {
                        blocks.push(block);
                    }
                }
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    match e.name().as_ref() {
                        b"workout" => in_workout = false,
                        b"author" | b"name" | b"description" => text_target = None,
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if skip_depth == 0 {
                    if let Some(target) = text_target {
                        let text = t.unescape()?;
                        let field = match target {
                            b'a' => &mut author,
                            b'n' => &mut name,
                            _ => &mut description,
                        };
                        field.push_str(text.trim());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(Error::WorkoutParse(
            "missing <workout_file> root element".to_string(),
        ));
    }

    debug!("parsed workout '{}' with {} blocks", name, blocks.len());

    Ok(Workout {
        id: stable_id(&name),
        name,
        author,
        description,
        blocks,
    })
}

fn parse_block(tag: &[u8], e: &BytesStart<'_>) -> Result<Option<WorkoutBlock>, Error> {
    let cadence = attr_u32(e, b"Cadence")?;

    let block = match tag {
        b"Warmup" => Some(WorkoutBlock::Warmup {
            duration_seconds: attr_u32(e, b"Duration")?.unwrap_or(0),
            cadence,
        }),
        b"SteadyState" => Some(WorkoutBlock::SteadyState {
            duration_seconds: attr_u32(e, b"Duration")?.unwrap_or(0),
            cadence,
        }),
        b"Cooldown" => Some(WorkoutBlock::Cooldown {
            duration_seconds: attr_u32(e, b"Duration")?.unwrap_or(0),
            cadence,
        }),
        b"Ramp" => Some(WorkoutBlock::Ramp {
            duration_seconds: attr_u32(e, b"Duration")?.unwrap_or(0),
            cadence,
        }),
        b"FreeRide" => Some(WorkoutBlock::Freeride {
            duration_seconds: attr_u32(e, b"Duration")?.unwrap_or(0),
            cadence,
        }),
        b"IntervalsT" => {
            let repeat = attr_u32(e, b"Repeat")?.unwrap_or(1);
            let on = attr_u32(e, b"OnDuration")?.unwrap_or(0);
            let off = attr_u32(e, b"OffDuration")?.unwrap_or(0);
            // Hand-edited files can carry absurd values; clamp instead
            // of overflowing.
            Some(WorkoutBlock::Interval {
                duration_seconds: repeat.saturating_mul(on.saturating_add(off)),
                cadence,
            })
        }
        _ => None,
    };

    Ok(block)
}

/// Read an integer attribute; unparseable values read as absent, matching
/// the lenient handling of hand-edited workout files.
fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<u32>, Error> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::WorkoutParse(err.to_string()))?;
        if attr.key.as_ref() == key {
            let value = String::from_utf8_lossy(&attr.value);
            return Ok(value.trim().parse::<u32>().ok());
        }
    }
    Ok(None)
}

/// Derive a stable workout id from its name, mirroring the ids produced
/// by the original catalog.
fn stable_id(name: &str) -> String {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish().to_string()
}
