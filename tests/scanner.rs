#[cfg(test)]
mod scanner_tests {
    use wrench::error::WrenchError;
    use wrench::scanner::*;
    use wrench::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_operators() {
        assert_token_sequence(
            "! != = == < <= > >=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "let answer = null;",
            &[
                (TokenType::LET, "let"),
                (TokenType::IDENTIFIER, "answer"),
                (TokenType::EQUAL, "="),
                (TokenType::NULL, "null"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );

        assert_token_sequence(
            "fun class this super",
            &[
                (TokenType::FUN, "fun"),
                (TokenType::CLASS, "class"),
                (TokenType::THIS, "this"),
                (TokenType::SUPER, "super"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_number_literals() {
        let scanner = Scanner::new("12 3.5".as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token_type, TokenType::NUMBER(12.0));
        assert_eq!(tokens[0].lexeme, "12");
        assert_eq!(tokens[1].token_type, TokenType::NUMBER(3.5));
        assert_eq!(tokens[1].lexeme, "3.5");
    }

    #[test]
    fn test_scanner_05_string_literals() {
        let scanner = Scanner::new("\"hello world\"".as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[0].token_type,
            TokenType::STRING("hello world".into())
        );
        assert_eq!(tokens[0].lexeme, "\"hello world\"");
    }

    #[test]
    fn test_scanner_05b_multiline_string_counts_lines() {
        let scanner = Scanner::new("\"one\ntwo\" 3".as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].lexeme, "\"one\ntwo\"");
        // Tokens after the literal carry the updated line number.
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_06_comments_skipped() {
        assert_token_sequence(
            "1 // all of this is ignored\n+ 2",
            &[
                (TokenType::NUMBER(1.0), "1"),
                (TokenType::PLUS, "+"),
                (TokenType::NUMBER(2.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_line_tracking() {
        let scanner = Scanner::new("1\n2\n\n3".as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_scanner_04b_number_token_display() {
        let scanner = Scanner::new("3 2.5 100000000000000000000".as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens[0].to_string(), "NUMBER 3 3.0");
        assert_eq!(tokens[1].to_string(), "NUMBER 2.5 2.5");
        // Integral literals past the i64 range must still print exactly.
        assert_eq!(
            tokens[2].to_string(),
            "NUMBER 100000000000000000000 100000000000000000000.0"
        );
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source.as_bytes());

        let results: Vec<_> = scanner.collect();

        // Expected: COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            let rendered = err.to_string();
            assert!(
                rendered.contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                rendered
            );
        }

        fn assert_token_matches(
            result: &Result<Token, WrenchError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_unterminated_string_error() {
        let scanner = Scanner::new("\"no closing quote".as_bytes());
        let results: Vec<_> = scanner.collect();

        // One error, then EOF.
        assert_eq!(results.len(), 2);
        assert!(results[0]
            .as_ref()
            .err()
            .map(|e| e.to_string().contains("Unterminated string"))
            .unwrap_or(false));
        assert!(matches!(
            results[1].as_ref().map(|t| t.token_type.clone()),
            Ok(TokenType::EOF)
        ));
    }
}
