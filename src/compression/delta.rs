
//! The mirrored delta transform that turns neighboring pixels
//! into small symbols, even near the value boundaries 0 and 255.
//!
//! The value range is folded at 128, so that a pixel and its
//! predecessor land in the lower half before their difference is taken.
//! Even symbols step downwards, odd symbols step upwards,
//! and symbols too large for either step stand for themselves.
//! Symbol zero always means "same value as the previous pixel".

use std::sync::OnceLock;


/// The precomputed inverse transform, `table[symbol][previous] -> pixel`,
/// for all 65536 combinations.
pub struct DeltaTable {
    decoded: [[u8; 256]; 256],
}

impl DeltaTable {

    fn compute() -> Self {
        let mut decoded = [[0_u8; 256]; 256];

        for symbol in 0 ..= 255_u8 {
            for previous in 0 ..= 255_u8 {
                decoded[symbol as usize][previous as usize] = decode_symbol(symbol, previous);
            }
        }

        Self { decoded }
    }

    /// The pixel value that `symbol` stands for, following `previous`.
    #[inline]
    pub fn decode(&self, symbol: u8, previous: u8) -> u8 {
        self.decoded[symbol as usize][previous as usize]
    }
}

/// The shared delta table. Computed once per process,
/// then read concurrently without any locking.
pub fn table() -> &'static DeltaTable {
    static TABLE: OnceLock<DeltaTable> = OnceLock::new();
    TABLE.get_or_init(DeltaTable::compute)
}

/// Fold the upper half of the value range onto the lower half.
fn mirror(value: u8) -> i32 {
    if value < 128 { i32::from(value) } else { 255 - i32::from(value) }
}

fn decode_symbol(symbol: u8, previous: u8) -> u8 {
    let mirrored_previous = mirror(previous);
    let symbol = i32::from(symbol);

    let value =
        if 2 * mirrored_previous < symbol { symbol }
        else if symbol % 2 == 1 { mirrored_previous + (symbol + 1) / 2 }
        else { mirrored_previous - symbol / 2 };

    // unmirror through the same condition the mirror used
    if previous < 128 { value as u8 } else { (255 - value) as u8 }
}

/// The symbol that stands for `pixel` following `previous`.
/// Exact inverse of the table lookup: mirror the pixel into the
/// same half as its predecessor, then pick the branch whose
/// decoded value lands on it.
pub fn encode(pixel: u8, previous: u8) -> u8 {
    let mirrored_previous = mirror(previous);

    let mirrored_pixel =
        if previous < 128 { i32::from(pixel) } else { 255 - i32::from(pixel) };

    let symbol =
        if mirrored_pixel > 2 * mirrored_previous { mirrored_pixel }
        else if mirrored_pixel > mirrored_previous { 2 * (mirrored_pixel - mirrored_previous) - 1 }
        else { 2 * (mirrored_previous - mirrored_pixel) };

    symbol as u8
}


#[cfg(test)]
mod test {
    use super::*;

    /// The single most important property of the codec.
    #[test]
    fn roundtrip_all_pairs(){
        let table = table();

        for previous in 0 ..= 255_u8 {
            for pixel in 0 ..= 255_u8 {
                let symbol = encode(pixel, previous);
                assert_eq!(
                    table.decode(symbol, previous), pixel,
                    "pixel {} after previous {} (symbol {})", pixel, previous, symbol
                );
            }
        }
    }

    #[test]
    fn zero_symbol_means_no_change(){
        let table = table();

        for previous in 0 ..= 255_u8 {
            assert_eq!(table.decode(0, previous), previous);
            assert_eq!(encode(previous, previous), 0);
        }
    }

    #[test]
    fn every_symbol_decodes_to_a_distinct_pixel(){
        // the transform is a permutation of the value range for every predecessor
        let table = table();

        for previous in 0 ..= 255_u8 {
            let mut seen = [false; 256];

            for symbol in 0 ..= 255_u8 {
                let pixel = table.decode(symbol, previous) as usize;
                assert!(!seen[pixel], "symbols collide for previous {}", previous);
                seen[pixel] = true;
            }
        }
    }

    #[test]
    fn small_steps_use_small_symbols(){
        // one step up or down is a one or two, independent of the neighborhood
        assert_eq!(encode(101, 100), 1);
        assert_eq!(encode(99, 100), 2);
        assert_eq!(encode(201, 200), 2);
        assert_eq!(encode(199, 200), 1);
        assert_eq!(encode(255, 254), 2);
        assert_eq!(encode(253, 254), 1);
        assert_eq!(encode(1, 0), 1);
    }
}
