//! DEFLATE block emission: token-stream to bitstream, choosing the cheapest
//! of stored/fixed/dynamic encodings per block (§4.1, §4.5).
//!
//! Grounded on RFC 1951 §3.2 directly (the teacher never writes DEFLATE, only
//! reads it) and mirrors `decompress::blocks`'s reading order exactly, since
//! that's the decoder this encoder must stay compatible with.

use crate::bitwriter::BitWriter;
use crate::compress::huffman::{bit_reverse, build_codes, build_lengths};
use crate::deflate_constants::*;

#[derive(Clone, Copy)]
pub(crate) enum Token {
    Literal(u8),
    Match { length: u16, offset: u16 },
}

struct HuffCode {
    lens: Vec<u8>,
    codes: Vec<u16>,
}

impl HuffCode {
    fn build(freqs: &[u32], max_len: usize) -> Self {
        let lens = build_lengths(freqs, max_len);
        let codes = build_codes(&lens);
        Self { lens, codes }
    }

    #[inline]
    fn write(&self, w: &mut BitWriter, sym: usize) {
        let len = self.lens[sym];
        debug_assert!(len > 0, "encoding a symbol with no assigned codeword");
        w.add_bits(bit_reverse(self.codes[sym], len) as u32, len as u32);
    }

    #[inline]
    fn bits_for(&self, sym: usize) -> u64 {
        self.lens[sym] as u64
    }
}

fn static_litlen_lens() -> Vec<u8> {
    let mut lens = vec![0u8; DEFLATE_NUM_LITLEN_SYMS];
    for l in lens.iter_mut().take(144) {
        *l = 8;
    }
    for l in lens.iter_mut().take(256).skip(144) {
        *l = 9;
    }
    for l in lens.iter_mut().take(280).skip(256) {
        *l = 7;
    }
    for l in lens.iter_mut().take(288).skip(280) {
        *l = 8;
    }
    lens
}

fn static_offset_lens() -> Vec<u8> {
    vec![5u8; DEFLATE_NUM_OFFSET_SYMS]
}

pub(crate) fn token_freqs(tokens: &[Token]) -> (Vec<u32>, Vec<u32>) {
    let mut litlen = vec![0u32; DEFLATE_NUM_LITLEN_SYMS];
    let mut offset = vec![0u32; DEFLATE_NUM_OFFSET_SYMS];
    for t in tokens {
        match *t {
            Token::Literal(b) => litlen[b as usize] += 1,
            Token::Match { length, offset: off } => {
                litlen[DEFLATE_END_OF_BLOCK + 1 + length_to_symbol(length as usize)] += 1;
                offset[offset_to_symbol(off as usize)] += 1;
            }
        }
    }
    litlen[DEFLATE_END_OF_BLOCK] = 1;
    (litlen, offset)
}

fn write_tokens(w: &mut BitWriter, tokens: &[Token], litlen: &HuffCode, offset: &HuffCode) {
    for t in tokens {
        match *t {
            Token::Literal(b) => litlen.write(w, b as usize),
            Token::Match { length, offset: off } => {
                let lsym = length_to_symbol(length as usize);
                litlen.write(w, DEFLATE_END_OF_BLOCK + 1 + lsym);
                let lextra = DEFLATE_LENGTH_SLOT_EXTRA_BITS[lsym] as u32;
                if lextra > 0 {
                    let base = DEFLATE_LENGTH_SLOT_BASE[lsym] as u32;
                    w.add_bits(length as u32 - base, lextra);
                }
                let osym = offset_to_symbol(off as usize);
                offset.write(w, osym);
                let oextra = DEFLATE_OFFSET_SLOT_EXTRA_BITS[osym] as u32;
                if oextra > 0 {
                    let base = DEFLATE_OFFSET_SLOT_BASE[osym] as u32;
                    w.add_bits(off as u32 - base, oextra);
                }
            }
        }
    }
    litlen.write(w, DEFLATE_END_OF_BLOCK);
}

fn tokens_bits(tokens: &[Token], litlen: &HuffCode, offset: &HuffCode) -> u64 {
    let mut bits = litlen.bits_for(DEFLATE_END_OF_BLOCK);
    for t in tokens {
        match *t {
            Token::Literal(b) => bits += litlen.bits_for(b as usize),
            Token::Match { length, offset: off } => {
                let lsym = length_to_symbol(length as usize);
                bits += litlen.bits_for(DEFLATE_END_OF_BLOCK + 1 + lsym);
                bits += DEFLATE_LENGTH_SLOT_EXTRA_BITS[lsym] as u64;
                let osym = offset_to_symbol(off as usize);
                bits += offset.bits_for(osym);
                bits += DEFLATE_OFFSET_SLOT_EXTRA_BITS[osym] as u64;
            }
        }
    }
    bits
}

/// Run-length-encodes a concatenated litlen+offset length array into
/// (precode symbol, extra value) pairs, per RFC 1951 §3.2.7.
fn rle_encode_lens(lens: &[u8]) -> Vec<(u8, u32)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lens.len() {
        let val = lens[i];
        let mut run = 1usize;
        while i + run < lens.len() && lens[i + run] == val && run < 138 {
            run += 1;
        }
        if val == 0 {
            let mut remaining = run;
            while remaining > 0 {
                if remaining >= 11 {
                    let take = remaining.min(138);
                    out.push((18u8, (take - 11) as u32));
                    remaining -= take;
                } else if remaining >= 3 {
                    let take = remaining.min(10);
                    out.push((17u8, (take - 3) as u32));
                    remaining -= take;
                } else {
                    for _ in 0..remaining {
                        out.push((0u8, 0u32));
                    }
                    remaining = 0;
                }
            }
        } else {
            out.push((val, 0));
            let mut remaining = run - 1;
            while remaining > 0 {
                if remaining >= 3 {
                    let take = remaining.min(6);
                    out.push((16u8, (take - 3) as u32));
                    remaining -= take;
                } else {
                    for _ in 0..remaining {
                        out.push((val, 0));
                    }
                    remaining = 0;
                }
            }
        }
        i += run;
    }
    out
}

fn used_len(lens: &[u8], min_count: usize) -> usize {
    let last_nonzero = lens.iter().rposition(|&l| l != 0).map(|i| i + 1).unwrap_or(0);
    last_nonzero.max(min_count)
}

struct DynamicPlan {
    litlen: HuffCode,
    offset: HuffCode,
    precode: HuffCode,
    precode_syms: Vec<(u8, u32)>,
    num_litlen_syms: usize,
    num_offset_syms: usize,
    num_precode_lens: usize,
    bits: u64,
}

fn plan_dynamic_block(tokens: &[Token]) -> DynamicPlan {
    let (litlen_freqs, offset_freqs) = token_freqs(tokens);
    let litlen = HuffCode::build(&litlen_freqs, DEFLATE_MAX_LITLEN_CODEWORD_LEN);
    let offset = HuffCode::build(&offset_freqs, DEFLATE_MAX_OFFSET_CODEWORD_LEN);

    let num_litlen_syms = used_len(&litlen.lens, 257);
    let num_offset_syms = used_len(&offset.lens, 1);

    let mut combined = Vec::with_capacity(num_litlen_syms + num_offset_syms);
    combined.extend_from_slice(&litlen.lens[..num_litlen_syms]);
    combined.extend_from_slice(&offset.lens[..num_offset_syms]);

    let precode_syms = rle_encode_lens(&combined);
    let mut precode_freqs = vec![0u32; DEFLATE_NUM_PRECODE_SYMS];
    for &(sym, _) in &precode_syms {
        precode_freqs[sym as usize] += 1;
    }
    let precode = HuffCode::build(&precode_freqs, DEFLATE_MAX_PRE_CODEWORD_LEN);

    let num_precode_lens = DEFLATE_PRECODE_LENS_PERMUTATION
        .iter()
        .rposition(|&sym| precode.lens[sym as usize] != 0)
        .map(|i| i + 1)
        .unwrap_or(4)
        .max(4);

    let mut bits = 5 + 5 + 4 + (num_precode_lens as u64 * 3);
    for &(sym, _) in &precode_syms {
        bits += precode.bits_for(sym as usize);
        bits += match sym {
            16 => 2,
            17 => 3,
            18 => 7,
            _ => 0,
        };
    }
    bits += tokens_bits(tokens, &litlen, &offset);

    DynamicPlan {
        litlen,
        offset,
        precode,
        precode_syms,
        num_litlen_syms,
        num_offset_syms,
        num_precode_lens,
        bits,
    }
}

fn write_dynamic_block(w: &mut BitWriter, tokens: &[Token], plan: &DynamicPlan) {
    w.add_bits((plan.num_litlen_syms - 257) as u32, 5);
    w.add_bits((plan.num_offset_syms - 1) as u32, 5);
    w.add_bits((plan.num_precode_lens - 4) as u32, 4);

    for &sym in &DEFLATE_PRECODE_LENS_PERMUTATION[..plan.num_precode_lens] {
        w.add_bits(plan.precode.lens[sym as usize] as u32, 3);
    }

    for &(sym, extra) in &plan.precode_syms {
        plan.precode.write(w, sym as usize);
        match sym {
            16 => w.add_bits(extra, 2),
            17 => w.add_bits(extra, 3),
            18 => w.add_bits(extra, 7),
            _ => {}
        }
    }

    write_tokens(w, tokens, &plan.litlen, &plan.offset);
}

fn write_fixed_block(w: &mut BitWriter, tokens: &[Token]) {
    let litlen = HuffCode {
        lens: static_litlen_lens(),
        codes: build_codes(&static_litlen_lens()),
    };
    let offset = HuffCode {
        lens: static_offset_lens(),
        codes: build_codes(&static_offset_lens()),
    };
    write_tokens(w, tokens, &litlen, &offset);
}

fn fixed_block_bits(tokens: &[Token]) -> u64 {
    let litlen = HuffCode {
        lens: static_litlen_lens(),
        codes: Vec::new(),
    };
    let offset = HuffCode {
        lens: static_offset_lens(),
        codes: Vec::new(),
    };
    tokens_bits(tokens, &litlen, &offset)
}

/// Writes one DEFLATE block for `raw` (the block's uncompressed bytes) and
/// its parsed `tokens`, picking whichever of stored/fixed/dynamic is
/// cheapest. `is_final` sets BFINAL.
pub(crate) fn emit_block(w: &mut BitWriter, raw: &[u8], tokens: &[Token], is_final: bool) {
    let stored_bits = {
        // Up to 7 bits to align to a byte boundary, then a 4-byte
        // LEN/NLEN header, then the raw bytes.
        7 + 32 + raw.len() as u64 * 8
    };
    let fixed_bits = 3 + fixed_block_bits(tokens);
    let plan = plan_dynamic_block(tokens);
    let dynamic_bits = 3 + plan.bits;

    w.add_bits(is_final as u32, 1);

    if raw.len() <= 65535 && stored_bits <= fixed_bits && stored_bits <= dynamic_bits {
        w.add_bits(DEFLATE_BLOCKTYPE_UNCOMPRESSED, 2);
        w.align_to_byte();
        w.write_u16_raw(raw.len() as u16);
        w.write_u16_raw(!(raw.len() as u16));
        w.write_bytes_raw(raw);
    } else if fixed_bits <= dynamic_bits {
        w.add_bits(DEFLATE_BLOCKTYPE_STATIC_HUFFMAN, 2);
        write_fixed_block(w, tokens);
    } else {
        w.add_bits(DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, 2);
        write_dynamic_block(w, tokens, &plan);
    }
}

/// Emits `raw` as a stored block unconditionally (level 0: store-only,
/// skipping the matcher and Huffman cost estimate entirely). `raw` must be
/// at most 65535 bytes, the stored block's `LEN` field width.
pub(crate) fn emit_stored_block(w: &mut BitWriter, raw: &[u8], is_final: bool) {
    debug_assert!(raw.len() <= 0xFFFF);
    w.add_bits(is_final as u32, 1);
    w.add_bits(DEFLATE_BLOCKTYPE_UNCOMPRESSED, 2);
    w.align_to_byte();
    w.write_u16_raw(raw.len() as u16);
    w.write_u16_raw(!(raw.len() as u16));
    w.write_bytes_raw(raw);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitReader;

    #[test]
    fn stored_block_round_trips_through_bit_reader() {
        let raw = b"hello world";
        let tokens: Vec<Token> = raw.iter().map(|&b| Token::Literal(b)).collect();
        let mut w = BitWriter::new();
        // force stored by using a raw slice much cheaper than any huffman coding
        emit_block(&mut w, raw, &tokens, true);
        let bytes = w.into_vec();

        let mut r = BitReader::new(&bytes);
        r.ensure_bits(3);
        assert_eq!(r.pop_bits(1), 1); // BFINAL
        let btype = r.pop_bits(2);
        assert_eq!(btype, DEFLATE_BLOCKTYPE_UNCOMPRESSED as u32);
        r.align_to_byte();
        let len = r.read_u16_raw().unwrap();
        let nlen = r.read_u16_raw().unwrap();
        assert_eq!(len, !nlen);
        assert_eq!(len as usize, raw.len());
    }
}
