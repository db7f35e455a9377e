//! Canonical Huffman decode-table construction (§4.2).
//!
//! This is the one piece of the decompressor ported closely from the
//! teacher's `build_decode_table` (itself a direct port of libdeflate's own
//! `build_decode_table`): count the codeword-length histogram, compute the
//! canonical first-codeword at each length, detect over/under-subscribed
//! codes, then fill a flat table (doubling it incrementally as codeword
//! lengths increase) plus subtables for codewords that exceed the primary
//! table width.
//!
//! Unlike the teacher, the table entry here is the plain 3-table design
//! described by the spec rather than the teacher's fused 2-literal "fast
//! table": one [`DecodeEntry`] decodes exactly one symbol.

use crate::deflate_constants::*;
use crate::unchecked::UncheckedArray;
use nightly_quirks::branch_pred::unlikely;

pub type LenType = u8;

/// A 32-bit tagged Huffman decode-table entry (§4.2).
///
/// Bits `[0, 8)` hold the number of bits to consume from the bit buffer for
/// this lookup (for a [`Kind::Subtable`] entry, this is the *primary* table
/// width, consumed before re-indexing into the subtable). Bits `[30, 32)`
/// tag which of the four payload shapes bits `[8, 30)` hold.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(transparent)]
pub struct DecodeEntry(u32);

const CONSUMED_BITS_MASK: u32 = 0xFF;
const KIND_SHIFT: u32 = 30;
const KIND_MASK: u32 = 0b11 << KIND_SHIFT;
const BASE_SHIFT: u32 = 8;
const BASE_MASK: u32 = 0xFFFF << BASE_SHIFT;
const EXTRA_SHIFT: u32 = 24;
const EXTRA_MASK: u32 = 0xF << EXTRA_SHIFT;
const SYMBOL_SHIFT: u32 = 8;
const SYMBOL_MASK: u32 = 0xFF << SYMBOL_SHIFT;

const KIND_BASE_EXTRA: u32 = 0; // length or offset: base value + extra bit count
const KIND_LITERAL: u32 = 1 << KIND_SHIFT; // literal byte, or precode symbol
const KIND_END_OF_BLOCK: u32 = 2 << KIND_SHIFT;
const KIND_SUBTABLE: u32 = 3 << KIND_SHIFT;

impl DecodeEntry {
    pub const ZERO: DecodeEntry = DecodeEntry(0);

    #[inline(always)]
    pub const fn consumed_bits(self) -> u32 {
        self.0 & CONSUMED_BITS_MASK
    }

    #[inline(always)]
    fn with_consumed_bits(self, bits: u32) -> Self {
        DecodeEntry((self.0 & !CONSUMED_BITS_MASK) | bits)
    }

    #[inline(always)]
    pub const fn is_literal(self) -> bool {
        (self.0 & KIND_MASK) == KIND_LITERAL
    }

    #[inline(always)]
    pub const fn is_end_of_block(self) -> bool {
        (self.0 & KIND_MASK) == KIND_END_OF_BLOCK
    }

    #[inline(always)]
    pub const fn is_subtable_pointer(self) -> bool {
        (self.0 & KIND_MASK) == KIND_SUBTABLE
    }

    #[inline(always)]
    pub const fn literal(self) -> u8 {
        ((self.0 & SYMBOL_MASK) >> SYMBOL_SHIFT) as u8
    }

    #[inline(always)]
    pub const fn base_value(self) -> u32 {
        (self.0 & BASE_MASK) >> BASE_SHIFT
    }

    #[inline(always)]
    pub const fn extra_bits(self) -> u32 {
        (self.0 & EXTRA_MASK) >> EXTRA_SHIFT
    }

    #[inline(always)]
    pub const fn subtable_index(self) -> u32 {
        self.base_value()
    }

    #[inline(always)]
    pub const fn subtable_bits(self) -> u32 {
        self.extra_bits()
    }

    const fn new_literal(lit: u8) -> Self {
        DecodeEntry(KIND_LITERAL | ((lit as u32) << SYMBOL_SHIFT))
    }

    const fn new_end_of_block() -> Self {
        DecodeEntry(KIND_END_OF_BLOCK)
    }

    const fn new_base_extra(base: u16, extra_bits: u8) -> Self {
        DecodeEntry(KIND_BASE_EXTRA | ((base as u32) << BASE_SHIFT) | ((extra_bits as u32) << EXTRA_SHIFT))
    }

    fn new_subtable_pointer(start: u16, bits: u8) -> Self {
        DecodeEntry(KIND_SUBTABLE | ((start as u32) << BASE_SHIFT) | ((bits as u32) << EXTRA_SHIFT))
    }
}

/// The fixed per-symbol decode result for each of the 19 precode symbols:
/// just the symbol value itself.
pub fn precode_decode_results() -> [DecodeEntry; DEFLATE_NUM_PRECODE_SYMS] {
    std::array::from_fn(|sym| DecodeEntry::new_literal(sym as u8))
}

/// The fixed per-symbol decode result for each of the 288 litlen symbols:
/// literals 0..255, end-of-block at 256, length base+extra-bits for 257..285
/// (286 and 287 are unused but must still decode to *something* so that a
/// decode table built over the full alphabet never reads an uninitialized
/// entry).
pub fn litlen_decode_results() -> [DecodeEntry; DEFLATE_NUM_LITLEN_SYMS] {
    std::array::from_fn(|sym| {
        if sym < DEFLATE_NUM_LITERALS {
            DecodeEntry::new_literal(sym as u8)
        } else if sym == DEFLATE_END_OF_BLOCK {
            DecodeEntry::new_end_of_block()
        } else if sym < 286 {
            let i = sym - 257;
            DecodeEntry::new_base_extra(
                DEFLATE_LENGTH_SLOT_BASE[i],
                DEFLATE_LENGTH_SLOT_EXTRA_BITS[i],
            )
        } else {
            DecodeEntry::new_base_extra(DEFLATE_LENGTH_SLOT_BASE[28], DEFLATE_LENGTH_SLOT_EXTRA_BITS[28])
        }
    })
}

/// The fixed per-symbol decode result for each of the 30 offset symbols (the
/// alphabet technically allows 32, the last two are unused).
pub fn offset_decode_results() -> [DecodeEntry; DEFLATE_NUM_OFFSET_SYMS] {
    std::array::from_fn(|sym| {
        if sym < 30 {
            DecodeEntry::new_base_extra(DEFLATE_OFFSET_SLOT_BASE[sym], DEFLATE_OFFSET_SLOT_EXTRA_BITS[sym])
        } else {
            DecodeEntry::new_base_extra(DEFLATE_OFFSET_SLOT_BASE[29], DEFLATE_OFFSET_SLOT_EXTRA_BITS[29])
        }
    })
}

/// Build a table for fast decoding of symbols from a canonical Huffman code.
///
/// `lens[sym]` is the codeword length assigned to symbol `sym` (0 = unused).
/// `decode_results[sym]` is the un-positioned decode entry for that symbol
/// (its `consumed_bits` field is filled in here). Returns `false` if the
/// lengths do not form a valid canonical code: over-subscribed always
/// rejected; under-subscribed (incomplete) accepted only for the empty code
/// and the single-length-1-codeword code (per §4.2 and RFC 1951 ambiguity
/// that real-world encoders rely on).
pub fn build_decode_table<const TABLE_SIZE: usize, const SUBTABLE_SIZE: usize>(
    decode_table: &mut UncheckedArray<DecodeEntry, TABLE_SIZE>,
    decode_subtable: &mut UncheckedArray<DecodeEntry, SUBTABLE_SIZE>,
    lens: &[LenType],
    num_syms: usize,
    decode_results: &[DecodeEntry],
    table_bits: usize,
    max_codeword_len: usize,
) -> bool {
    let mut len_counts = [0u32; DEFLATE_MAX_CODEWORD_LEN + 1];
    let mut max_len = 0usize;
    for &l in &lens[..num_syms] {
        len_counts[l as usize] += 1;
        max_len = max_len.max(l as usize);
    }

    let mut offsets = [0u32; DEFLATE_MAX_CODEWORD_LEN + 2];
    let mut codespace_used: u32 = 0;
    offsets[1] = len_counts[0];
    for len in 1..max_codeword_len {
        offsets[len + 1] = offsets[len] + len_counts[len];
        codespace_used = (codespace_used << 1) + len_counts[len];
    }
    codespace_used = (codespace_used << 1) + len_counts[max_codeword_len];

    let mut sorted_syms = vec![0u16; num_syms];
    for sym in 0..num_syms {
        let l = lens[sym] as usize;
        sorted_syms[offsets[l] as usize] = sym as u16;
        offsets[l] += 1;
    }
    let sorted_syms = &sorted_syms[offsets[0] as usize..num_syms];

    if unlikely(codespace_used > (1u32 << max_codeword_len)) {
        return false;
    }

    if unlikely(codespace_used < (1u32 << max_codeword_len)) {
        let sym = if codespace_used == 0 {
            0
        } else {
            if codespace_used != (1u32 << (max_codeword_len - 1)) || len_counts[1] != 1 {
                return false;
            }
            sorted_syms[0] as usize
        };
        let entry = decode_results[sym].with_consumed_bits(1);
        for e in decode_table.0.iter_mut() {
            *e = entry;
        }
        return true;
    }

    let mut codeword: usize = 0;
    let mut start_len = 1;
    while len_counts[start_len] == 0 {
        start_len += 1;
    }
    let mut cur_table_end = 1usize << (start_len - 1);
    let mut sym_index = 0usize;

    for len in start_len..=table_bits {
        if len != start_len {
            decode_table.0.copy_within(0..cur_table_end, cur_table_end);
        }
        cur_table_end *= 2;

        for _ in 0..len_counts[len] {
            decode_table[codeword] =
                decode_results[sorted_syms[sym_index] as usize].with_consumed_bits(len as u32);
            sym_index += 1;
            codeword = advance_codeword(codeword, cur_table_end - 1);
        }
    }

    if max_len <= table_bits {
        return true;
    }

    let mut subtable_prefix = usize::MAX;
    let mut subtable_start = 0usize;
    let mut subtable_end = 0usize;

    for len in (table_bits + 1)..=max_len {
        for i in 0..len_counts[len] {
            if (codeword & ((1 << table_bits) - 1)) != subtable_prefix {
                subtable_prefix = codeword & ((1 << table_bits) - 1);
                subtable_start = subtable_end;

                let mut subtable_bits = len - table_bits;
                let mut remaining = len_counts[len] - i;
                while remaining < (1u32 << subtable_bits) {
                    subtable_bits += 1;
                    remaining = (remaining << 1) + len_counts[table_bits + subtable_bits];
                }

                subtable_end += 1 << subtable_bits;

                decode_table[subtable_prefix] =
                    DecodeEntry::new_subtable_pointer(subtable_start as u16, subtable_bits as u8)
                        .with_consumed_bits(table_bits as u32);
            }

            let entry = decode_results[sorted_syms[sym_index] as usize]
                .with_consumed_bits((len - table_bits) as u32);
            sym_index += 1;

            let mut j = subtable_start + (codeword >> table_bits);
            let stride = 1 << (len - table_bits);
            while j < subtable_end {
                decode_subtable[j] = entry;
                j += stride;
            }

            codeword = advance_codeword(codeword, (1 << len) - 1);
        }
    }

    true
}

/// Advance `codeword` (bit-reversed, within a codespace of `mask + 1`) to
/// the lexicographically next codeword of a canonical code.
const fn advance_codeword(codeword: usize, mask: usize) -> usize {
    let flipped = (codeword ^ mask) as u32;
    let bit = 1usize << (31 - flipped.leading_zeros());
    (codeword & (bit - 1)) | bit
}
