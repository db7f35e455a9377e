//! Greedy and lazy LZ77 parsing strategies (§4.5) for levels 1-7, over the
//! hash-chain match finder. Levels 8-12 don't use this module's `parse()` at
//! all — they get the shortest-path cost-model parser in `optimal.rs`,
//! over the binary-tree match finder in `bintree.rs`; `LEVEL_PARAMS` still
//! supplies the `max_chain`/`nice_len` search-depth knobs those levels use,
//! since both parsers are tuned from the same per-level table.

use super::emit::Token;
use super::matchfinder::MatchFinder;
use crate::deflate_constants::DEFLATE_MIN_MATCH_LEN;

pub(crate) struct LevelParams {
    pub max_chain: usize,
    pub nice_len: usize,
    pub lazy: bool,
}

/// Indexed by compression level 0..=12. Level 0 never reaches the matcher
/// (stored-only, handled by the caller); its entry here is a placeholder.
pub(crate) const LEVEL_PARAMS: [LevelParams; 13] = [
    LevelParams { max_chain: 0, nice_len: 0, lazy: false },
    LevelParams { max_chain: 4, nice_len: 8, lazy: false },
    LevelParams { max_chain: 8, nice_len: 16, lazy: false },
    LevelParams { max_chain: 16, nice_len: 32, lazy: false },
    LevelParams { max_chain: 24, nice_len: 32, lazy: true },
    LevelParams { max_chain: 32, nice_len: 64, lazy: true },
    LevelParams { max_chain: 48, nice_len: 128, lazy: true },
    LevelParams { max_chain: 64, nice_len: 128, lazy: true },
    LevelParams { max_chain: 128, nice_len: 258, lazy: true },
    LevelParams { max_chain: 256, nice_len: 258, lazy: true },
    LevelParams { max_chain: 512, nice_len: 258, lazy: true },
    LevelParams { max_chain: 1024, nice_len: 258, lazy: true },
    LevelParams { max_chain: 2048, nice_len: 258, lazy: true },
];

/// Greedily (or lazily, one token of lookahead) parses `data` into a token
/// stream of literals and matches.
pub(crate) fn parse(data: &[u8], params: &LevelParams) -> Vec<Token> {
    let mut mf = MatchFinder::new(data, params.max_chain, params.nice_len);
    let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
    let mut pos = 0usize;

    while pos < data.len() {
        let candidate = mf.find_match(pos, DEFLATE_MIN_MATCH_LEN);
        mf.insert(pos);

        let Some(m) = candidate else {
            tokens.push(Token::Literal(data[pos]));
            pos += 1;
            continue;
        };

        if params.lazy && pos + 1 < data.len() {
            if let Some(next) = mf.find_match(pos + 1, m.length + 1) {
                let _ = next;
                tokens.push(Token::Literal(data[pos]));
                pos += 1;
                continue;
            }
        }

        for k in (pos + 1)..(pos + m.length).min(data.len()) {
            mf.insert(k);
        }
        tokens.push(Token::Match {
            length: m.length as u16,
            offset: m.offset as u16,
        });
        pos += m.length;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_parse_round_trips_to_same_length() {
        let data = b"the quick brown fox the quick brown fox jumps over";
        let tokens = parse(data, &LEVEL_PARAMS[6]);
        let decoded_len: usize = tokens
            .iter()
            .map(|t| match t {
                Token::Literal(_) => 1,
                Token::Match { length, .. } => *length as usize,
            })
            .sum();
        assert_eq!(decoded_len, data.len());
    }

    #[test]
    fn lazy_parse_finds_the_longer_match() {
        // "aaaaa|Xaaaaaaa" — a lazy matcher should defer one byte to catch
        // the 7-byte match at offset+1 instead of greedily taking the
        // shorter match on the first 'a'.
        let data = b"aaaaaXaaaaaaab";
        let tokens = parse(data, &LEVEL_PARAMS[9]);
        let has_long_match = tokens.iter().any(|t| matches!(t, Token::Match { length, .. } if *length >= 6));
        assert!(has_long_match);
    }
}
