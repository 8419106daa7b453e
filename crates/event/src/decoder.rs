use thiserror::Error;

/// Pixels packed per payload byte, LSB-first: pixel j of a byte occupies
/// bits [2j, 2j+1].
pub const PIXELS_PER_BYTE: usize = 4;

/// Wire codes. The assignment is a sensor convention and must be kept for
/// wire compatibility.
const CODE_NONE: u8 = 0b00;
const CODE_ON: u8 = 0b01;
const CODE_OFF: u8 = 0b10;

/// Visualization values: no event renders neutral gray, ON bright, OFF dark.
pub const NEUTRAL: u8 = 128;
pub const ON_VALUE: u8 = 255;
pub const OFF_VALUE: u8 = 0;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("destination is {actual} pixels, packed payload decodes to {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

fn check_sizes(packed: &[u8], dst: &[u8]) -> Result<(), DecodeError> {
    let expected = packed.len() * PIXELS_PER_BYTE;
    if dst.len() != expected {
        return Err(DecodeError::SizeMismatch {
            expected,
            actual: dst.len(),
        });
    }
    Ok(())
}

fn code_at(word: u8, pixel: usize) -> u8 {
    (word >> (2 * pixel)) & 0b11
}

/// Event-coded pixels in one packed word (0..=4).
fn event_population(word: u8) -> u32 {
    (0..PIXELS_PER_BYTE)
        .filter(|&j| matches!(code_at(word, j), CODE_ON | CODE_OFF))
        .count() as u32
}

/// Fresh decode: unconditionally overwrite every destination pixel.
/// Undefined code `11` renders as neutral.
pub fn decode_full(packed: &[u8], dst: &mut [u8]) -> Result<(), DecodeError> {
    check_sizes(packed, dst)?;

    for (i, &word) in packed.iter().enumerate() {
        for j in 0..PIXELS_PER_BYTE {
            dst[i * PIXELS_PER_BYTE + j] = match code_at(word, j) {
                CODE_ON => ON_VALUE,
                CODE_OFF => OFF_VALUE,
                _ => NEUTRAL,
            };
        }
    }
    Ok(())
}

/// Accumulating decode: overwrite only ON/OFF pixels, leaving `00` pixels
/// untouched so prior sub-frames' events persist (last event wins, a
/// no-event never erases).
pub fn decode_accum(packed: &[u8], dst: &mut [u8]) -> Result<(), DecodeError> {
    check_sizes(packed, dst)?;

    for (i, &word) in packed.iter().enumerate() {
        for j in 0..PIXELS_PER_BYTE {
            match code_at(word, j) {
                CODE_ON => dst[i * PIXELS_PER_BYTE + j] = ON_VALUE,
                CODE_OFF => dst[i * PIXELS_PER_BYTE + j] = OFF_VALUE,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Accumulating decode with spatial noise suppression: a word's pixels are
/// classified only when the event population of that word plus the word
/// directly above it (same column, previous row) reaches 2. Isolated
/// single-pixel events are dropped at the cost of one row of latency.
/// The first row has no row above and is judged on its own population.
///
/// `words_per_row` = sensor width / 4.
pub fn decode_accum_filtered(
    packed: &[u8],
    dst: &mut [u8],
    words_per_row: usize,
) -> Result<(), DecodeError> {
    check_sizes(packed, dst)?;

    for (i, &word) in packed.iter().enumerate() {
        let own = event_population(word);
        let above = if i >= words_per_row {
            event_population(packed[i - words_per_row])
        } else {
            0
        };
        if own + above < 2 {
            continue;
        }

        for j in 0..PIXELS_PER_BYTE {
            match code_at(word, j) {
                CODE_ON => dst[i * PIXELS_PER_BYTE + j] = ON_VALUE,
                CODE_OFF => dst[i * PIXELS_PER_BYTE + j] = OFF_VALUE,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Pack pixel values (neutral/ON/OFF) into the 2-bit wire format. Test and
/// calibration helper; the inverse of `decode_full`.
pub fn pack_pixels(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks(PIXELS_PER_BYTE)
        .map(|chunk| {
            let mut word = 0u8;
            for (j, &px) in chunk.iter().enumerate() {
                let code = match px {
                    ON_VALUE => CODE_ON,
                    OFF_VALUE => CODE_OFF,
                    _ => CODE_NONE,
                };
                word |= code << (2 * j);
            }
            word
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_decode_maps_all_three_codes() {
        // One word: pixel0=ON, pixel1=OFF, pixel2=none, pixel3=none.
        let packed = [0b0000_1001u8];
        let mut dst = [0u8; 4];
        decode_full(&packed, &mut dst).unwrap();
        assert_eq!(dst, [ON_VALUE, OFF_VALUE, NEUTRAL, NEUTRAL]);
    }

    #[test]
    fn undefined_code_renders_neutral() {
        let packed = [0b0000_0011u8]; // pixel0 = 11
        let mut dst = [9u8; 4];
        decode_full(&packed, &mut dst).unwrap();
        assert_eq!(dst[0], NEUTRAL);
    }

    #[test]
    fn accum_preserves_prior_events_under_no_event() {
        let on_everywhere = [0b0101_0101u8];
        let silent = [0b0000_0000u8];

        let mut dst = [0u8; 4];
        decode_full(&on_everywhere, &mut dst).unwrap();
        decode_accum(&silent, &mut dst).unwrap();
        assert_eq!(dst, [ON_VALUE; 4], "no-event must never erase an event");
    }

    #[test]
    fn accum_after_full_is_idempotent_on_identical_input() {
        let packed = [0b0110_0100u8, 0b1001_0000u8];
        let mut once = [0u8; 8];
        decode_full(&packed, &mut once).unwrap();

        let mut twice = once;
        decode_accum(&packed, &mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn accum_is_last_write_wins() {
        let on = [0b0000_0001u8];
        let off = [0b0000_0010u8];

        let mut dst = [NEUTRAL; 4];
        decode_accum(&on, &mut dst).unwrap();
        decode_accum(&off, &mut dst).unwrap();
        assert_eq!(dst[0], OFF_VALUE);
    }

    #[test]
    fn filter_drops_isolated_events_and_keeps_pairs() {
        // Two rows, one word each. Row 0 word has a single event (dropped),
        // row 1 word has two events (kept regardless of the row above).
        let packed = [0b0000_0001u8, 0b0000_1001u8];
        let mut dst = [NEUTRAL; 8];
        decode_accum_filtered(&packed, &mut dst, 1).unwrap();

        assert_eq!(dst[0], NEUTRAL, "isolated event suppressed");
        assert_eq!(dst[4], ON_VALUE);
        assert_eq!(dst[5], OFF_VALUE);
    }

    #[test]
    fn filter_counts_word_above_toward_threshold() {
        // Single event in each of two vertically adjacent words: the upper
        // one is judged alone (dropped), the lower one sees 1 + 1 (kept).
        let packed = [0b0000_0001u8, 0b0000_0001u8];
        let mut dst = [NEUTRAL; 8];
        decode_accum_filtered(&packed, &mut dst, 1).unwrap();

        assert_eq!(dst[0], NEUTRAL);
        assert_eq!(dst[4], ON_VALUE);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let packed = [0u8; 2];
        let mut dst = [0u8; 7];
        assert!(matches!(
            decode_full(&packed, &mut dst),
            Err(DecodeError::SizeMismatch {
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn pack_round_trips_through_full_decode() {
        let pixels = [ON_VALUE, NEUTRAL, OFF_VALUE, NEUTRAL, ON_VALUE, ON_VALUE, NEUTRAL, OFF_VALUE];
        let packed = pack_pixels(&pixels);
        let mut back = [0u8; 8];
        decode_full(&packed, &mut back).unwrap();
        assert_eq!(back, pixels);
    }
}
