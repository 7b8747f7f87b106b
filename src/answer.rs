use crate::catalog::Article;
use thiserror::Error;

/// What the user typed at an answer prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Answer(Article),
    Hint,
    Skip,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input '{0}'")]
pub struct InputParseError(pub String);

/// Map a typed article, numeric shortcut, or gender abbreviation to an article.
pub fn parse_article(input: &str) -> Option<Article> {
    match input.trim().to_lowercase().as_str() {
        "1" | "die" | "f" | "fem" | "feminine" => Some(Article::Die),
        "2" | "der" | "r" | "m" | "masc" | "masculine" => Some(Article::Der),
        "3" | "das" | "s" | "n" | "neut" | "neuter" => Some(Article::Das),
        _ => None,
    }
}

/// Parse an answer prompt line. Control words win over article aliases,
/// so a bare `s` skips rather than answering "das".
pub fn parse_response(input: &str) -> Result<Response, InputParseError> {
    let normalized = input.trim().to_lowercase();
    match normalized.as_str() {
        "q" | "quit" | "exit" => Ok(Response::Quit),
        "?" | "h" | "hint" => Ok(Response::Hint),
        "s" | "skip" => Ok(Response::Skip),
        other => parse_article(other)
            .map(Response::Answer)
            .ok_or_else(|| InputParseError(input.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_shortcuts() {
        assert_eq!(parse_response("1"), Ok(Response::Answer(Article::Die)));
        assert_eq!(parse_response("2"), Ok(Response::Answer(Article::Der)));
        assert_eq!(parse_response("3"), Ok(Response::Answer(Article::Das)));
    }

    #[test]
    fn test_full_articles_ignore_case_and_whitespace() {
        assert_eq!(parse_response("  DER "), Ok(Response::Answer(Article::Der)));
        assert_eq!(parse_response("Die"), Ok(Response::Answer(Article::Die)));
        assert_eq!(parse_response("das\n"), Ok(Response::Answer(Article::Das)));
    }

    #[test]
    fn test_gender_aliases() {
        for alias in ["f", "fem", "feminine"] {
            assert_eq!(parse_article(alias), Some(Article::Die), "{alias}");
        }
        for alias in ["r", "m", "masc", "masculine"] {
            assert_eq!(parse_article(alias), Some(Article::Der), "{alias}");
        }
        for alias in ["n", "neut", "neuter", "s"] {
            assert_eq!(parse_article(alias), Some(Article::Das), "{alias}");
        }
    }

    #[test]
    fn test_control_words() {
        for word in ["q", "quit", "EXIT"] {
            assert_eq!(parse_response(word), Ok(Response::Quit));
        }
        for word in ["?", "h", "hint"] {
            assert_eq!(parse_response(word), Ok(Response::Hint));
        }
        assert_eq!(parse_response("skip"), Ok(Response::Skip));
    }

    #[test]
    fn test_bare_s_skips_at_the_prompt() {
        assert_eq!(parse_response("s"), Ok(Response::Skip));
    }

    #[test]
    fn test_unrecognized_input() {
        assert_eq!(
            parse_response(" den "),
            Err(InputParseError("den".to_string()))
        );
        assert!(parse_response("").is_err());
        assert!(parse_response("4").is_err());
    }
}
