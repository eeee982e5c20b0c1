
//! Compresses and decompresses one scanline of one channel at a time:
//! a bit-packed sequence of zero runs and literal samples
//! over mirrored-delta symbols.

pub mod delta;

use crate::error::{Error, Result, UnitResult, u64_to_usize};
use crate::io::{BitReader, BitWriter, Read, Write, read_count, write_count};
use crate::math::floor_log_2;


/// A run never spans more than this many samples.
const MAX_RUN_LENGTH: usize = 255;

/// One entry of the token stream. The samples of a literal run
/// follow the token immediately, `sample_bits` wide each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {

    /// The next `count` positions hold the neutral symbol zero.
    ZeroRun {
        count: usize,
    },

    /// The next `count` samples are stored verbatim.
    /// The decoder accepts any count, even though
    /// the encoder in this crate only ever writes single samples.
    LiteralRun {
        sample_bits: usize,
        count: usize,
    },
}

impl Token {

    fn read(input: &mut BitReader<impl Read>) -> Result<Self> {
        let width_code = input.read_bits(3)? as usize;
        let count = u64_to_usize(read_count(input)? + 1, "token sample count")?;

        Ok(match width_code {
            0 => Token::ZeroRun { count },
            code => Token::LiteralRun { sample_bits: code + 1, count },
        })
    }

    fn write(self, output: &mut BitWriter<impl Write>) -> UnitResult {
        let (width_code, count) = match self {
            Token::ZeroRun { count } => (0, count),
            Token::LiteralRun { sample_bits, count } => (sample_bits - 1, count),
        };

        output.write_bits(width_code as u32, 3)?;
        write_count(output, (count - 1) as u32)
    }
}


/// Decode the next `line.len()` samples from the bit stream into the line.
/// Reads tokens until the line is full, then resolves the delta symbols
/// left to right, using each already-resolved pixel as the context of the next.
/// The first pixel of the line is never delta-coded.
pub fn decompress_line(input: &mut BitReader<impl Read>, line: &mut [u8]) -> UnitResult {
    let width = line.len();
    let mut filled = 0;

    while filled < width {
        match Token::read(input)? {

            Token::ZeroRun { count } => {
                // a run may overshoot the end of the line,
                // the excess stands for no samples at all
                let run_end = filled.saturating_add(count).min(width);
                for sample in &mut line[filled .. run_end] {
                    *sample = 0;
                }

                filled = run_end;
            },

            Token::LiteralRun { sample_bits, count } => {
                for _ in 0 .. count {
                    if filled == width {
                        return Err(Error::invalid("literal sample past the end of the line"));
                    }

                    line[filled] = input.read_bits(sample_bits)? as u8;
                    filled += 1;
                }
            },
        }
    }

    let table = delta::table();
    for index in 1 .. width {
        line[index] = table.decode(line[index], line[index - 1]);
    }

    Ok(())
}

/// Encode one line of samples into the bit stream.
/// The first pixel is stored as-is, every later pixel as the delta symbol
/// against its original predecessor. Consecutive zero symbols collapse
/// into one run token; every nonzero symbol becomes one literal token.
pub fn compress_line(output: &mut BitWriter<impl Write>, line: &[u8]) -> UnitResult {
    if line.is_empty() {
        return Ok(());
    }

    let mut symbols = Vec::with_capacity(line.len());
    symbols.push(line[0]);
    for index in 1 .. line.len() {
        symbols.push(delta::encode(line[index], line[index - 1]));
    }

    let mut position = 0;
    while position < symbols.len() {
        let value = symbols[position];

        if value == 0 {
            // a single zero also takes this path,
            // as width code zero is the only representation of a zero symbol
            let run_length = symbols[position ..].iter()
                .take(MAX_RUN_LENGTH).take_while(|&&symbol| symbol == 0)
                .count();

            Token::ZeroRun { count: run_length }.write(output)?;
            position += run_length;
        }
        else {
            Token::LiteralRun { sample_bits: literal_sample_bits(value), count: 1 }.write(output)?;
            output.write_bits(u32::from(value), literal_sample_bits(value))?;
            position += 1;
        }
    }

    Ok(())
}

/// The number of bits a literal sample of this value occupies.
/// Width code zero tags a zero run, so literals are at least two bits wide.
fn literal_sample_bits(value: u8) -> usize {
    (floor_log_2(u32::from(value)) as usize + 1).max(2)
}
