//! Splits a raw line into whitespace-delimited argument tokens.

use anyhow::{Context, Result};

/// Characters that separate tokens. BEL is the one non-whitespace separator
/// honored for compatibility with classic tokenizers.
pub(crate) const TOKEN_DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Capacity step for the token vector.
const TOKEN_BUFFER_STEP: usize = 64;

/// Split a line into tokens on [`TOKEN_DELIMITERS`].
///
/// Runs of delimiters collapse, so the result never contains an empty token
/// and an empty or all-delimiter line yields an empty vector. Tokens are
/// owned copies; the input line is left untouched. The only error is a
/// failed buffer reservation, which the caller treats as fatal.
pub(crate) fn split_line(line: &str) -> Result<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    reserve_step(&mut tokens)?;

    for piece in line.split(|c: char| TOKEN_DELIMITERS.contains(&c)) {
        if piece.is_empty() {
            continue;
        }
        if tokens.len() == tokens.capacity() {
            reserve_step(&mut tokens)?;
        }
        tokens.push(piece.to_owned());
    }
    Ok(tokens)
}

fn reserve_step(tokens: &mut Vec<String>) -> Result<()> {
    tokens
        .try_reserve_exact(TOKEN_BUFFER_STEP)
        .context("could not grow the token vector")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        let tokens = split_line("echo hello world").unwrap();
        assert_eq!(tokens, vec!["echo", "hello", "world"]);
    }

    #[test]
    fn consecutive_delimiters_produce_no_empty_tokens() {
        let tokens = split_line("  ls \t  -l \r\n").unwrap();
        assert_eq!(tokens, vec!["ls", "-l"]);
    }

    #[test]
    fn empty_and_all_delimiter_lines_yield_nothing() {
        assert!(split_line("").unwrap().is_empty());
        assert!(split_line(" \t \r \x07 ").unwrap().is_empty());
    }

    #[test]
    fn bell_character_separates_tokens() {
        let tokens = split_line("a\x07b\x07\x07c").unwrap();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn token_count_beyond_one_buffer_step() {
        let line = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let tokens = split_line(&line).unwrap();
        assert_eq!(tokens.len(), 200);
        assert_eq!(tokens[0], "0");
        assert_eq!(tokens[199], "199");
    }

    #[test]
    fn non_delimiter_punctuation_stays_inside_tokens() {
        let tokens = split_line("cd ../some-dir/with.dots").unwrap();
        assert_eq!(tokens, vec!["cd", "../some-dir/with.dots"]);
    }
}
