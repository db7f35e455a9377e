//! Decode-table sizing constants and the [`DecodeTables`] struct that bundles
//! all the Huffman state a [`crate::Decompressor`] carries between calls.
//!
//! Grounded on the teacher's `decompress_deflate.rs` TABLEBITS/ENOUGH
//! constants and `LibdeflateDecodeTables`; narrowed to the plain `DecodeEntry`
//! table shape (see `decode_table.rs`) instead of the teacher's fused
//! fast-decode table.

use crate::decode_table::{
    build_decode_table, litlen_decode_results, offset_decode_results, precode_decode_results,
    DecodeEntry, LenType,
};
use crate::deflate_constants::*;
use crate::unchecked::UncheckedArray;

pub const PRECODE_TABLEBITS: usize = DEFLATE_MAX_PRE_CODEWORD_LEN;
pub const LITLEN_TABLEBITS: usize = 10;
pub const OFFSET_TABLEBITS: usize = 8;

/* Computed with zlib's 'enough' utility for (nsyms, tablebits, maxlen). */
const PRECODE_ENOUGH: usize = 128; /* enough 19 7 7 */
const LITLEN_ENOUGH: usize = 1334; /* enough 288 10 15 */
const OFFSET_ENOUGH: usize = 402; /* enough 32 8 15 */

pub const PRECODE_TABLESIZE: usize = 1 << PRECODE_TABLEBITS;
pub const LITLEN_TABLESIZE: usize = 1 << LITLEN_TABLEBITS;
pub const OFFSET_TABLESIZE: usize = 1 << OFFSET_TABLEBITS;

pub const PRECODE_SUBTABLESIZE: usize = PRECODE_ENOUGH - PRECODE_TABLESIZE;
pub const LITLEN_SUBTABLESIZE: usize = LITLEN_ENOUGH - LITLEN_TABLESIZE;
pub const OFFSET_SUBTABLESIZE: usize = OFFSET_ENOUGH - OFFSET_TABLESIZE;

const_assert!(PRECODE_TABLEBITS == 7 && PRECODE_ENOUGH == 128);
const_assert!(LITLEN_TABLEBITS == 10 && LITLEN_ENOUGH == 1334);
const_assert!(OFFSET_TABLEBITS == 8 && OFFSET_ENOUGH == 402);

const TOTAL_LENS: usize = DEFLATE_NUM_LITLEN_SYMS + DEFLATE_NUM_OFFSET_SYMS + DEFLATE_MAX_LENS_OVERRUN;

/// Huffman decode tables for one [`crate::Decompressor`] handle, reused
/// across calls (the teacher's `static_codes_loaded` fast path for repeated
/// fixed-Huffman blocks carries over unchanged, see `SPEC_FULL.md` §10).
pub(crate) struct DecodeTables {
    pub(crate) lens: UncheckedArray<LenType, TOTAL_LENS>,
    pub(crate) precode_lens: UncheckedArray<LenType, DEFLATE_NUM_PRECODE_SYMS>,

    pub(crate) precode_table: UncheckedArray<DecodeEntry, PRECODE_TABLESIZE>,
    pub(crate) precode_subtable: UncheckedArray<DecodeEntry, PRECODE_SUBTABLESIZE>,

    pub(crate) litlen_table: UncheckedArray<DecodeEntry, LITLEN_TABLESIZE>,
    pub(crate) litlen_subtable: UncheckedArray<DecodeEntry, LITLEN_SUBTABLESIZE>,

    pub(crate) offset_table: UncheckedArray<DecodeEntry, OFFSET_TABLESIZE>,
    pub(crate) offset_subtable: UncheckedArray<DecodeEntry, OFFSET_SUBTABLESIZE>,

    pub(crate) static_codes_loaded: bool,
}

impl DecodeTables {
    pub(crate) fn new() -> Self {
        Self {
            lens: UncheckedArray::default(),
            precode_lens: UncheckedArray::default(),
            precode_table: UncheckedArray::default(),
            precode_subtable: UncheckedArray::default(),
            litlen_table: UncheckedArray::default(),
            litlen_subtable: UncheckedArray::default(),
            offset_table: UncheckedArray::default(),
            offset_subtable: UncheckedArray::default(),
            static_codes_loaded: false,
        }
    }

    pub(crate) fn build_precode_table(&mut self, num_syms: usize) -> bool {
        build_decode_table(
            &mut self.precode_table,
            &mut self.precode_subtable,
            &self.precode_lens.0,
            num_syms,
            &precode_decode_results(),
            PRECODE_TABLEBITS,
            DEFLATE_MAX_PRE_CODEWORD_LEN,
        )
    }

    pub(crate) fn build_litlen_table(&mut self, num_litlen_syms: usize) -> bool {
        build_decode_table(
            &mut self.litlen_table,
            &mut self.litlen_subtable,
            &self.lens.0[..num_litlen_syms],
            num_litlen_syms,
            &litlen_decode_results(),
            LITLEN_TABLEBITS,
            DEFLATE_MAX_LITLEN_CODEWORD_LEN,
        )
    }

    pub(crate) fn build_offset_table(&mut self, num_litlen_syms: usize, num_offset_syms: usize) -> bool {
        build_decode_table(
            &mut self.offset_table,
            &mut self.offset_subtable,
            &self.lens.0[num_litlen_syms..num_litlen_syms + num_offset_syms],
            num_offset_syms,
            &offset_decode_results(),
            OFFSET_TABLEBITS,
            DEFLATE_MAX_OFFSET_CODEWORD_LEN,
        )
    }

    pub(crate) fn load_static_huffman_lens(&mut self) {
        const_assert!(DEFLATE_NUM_LITLEN_SYMS == 288);
        const_assert!(DEFLATE_NUM_OFFSET_SYMS == 32);

        for i in 0..144 {
            self.lens[i] = 8;
        }
        for i in 144..256 {
            self.lens[i] = 9;
        }
        for i in 256..280 {
            self.lens[i] = 7;
        }
        for i in 280..288 {
            self.lens[i] = 8;
        }
        for i in 288..(288 + 32) {
            self.lens[i] = 5;
        }
    }
}
