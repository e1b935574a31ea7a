//! Placeholder tokenization
//!
//! Single forward pass over the text using a small state machine. Malformed
//! input (a `{{` that never closes) yields no token and is left as text.

/// Classified content of a `{{...}}` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `{{path}}`: scalar, region opener or custom placeholder
    Placeholder { path: String },

    /// `{{keyword args}}`
    Command { keyword: String, args: String },

    /// `{{/path}}`
    BlockEnd { path: String },
}

impl TokenKind {
    fn classify(content: &str) -> Self {
        let trimmed = content.trim();

        if let Some(rest) = trimmed.strip_prefix('/') {
            return TokenKind::BlockEnd {
                path: rest.trim().to_string(),
            };
        }

        match trimmed.split_once(char::is_whitespace) {
            Some((keyword, args)) => TokenKind::Command {
                keyword: keyword.to_string(),
                args: args.trim().to_string(),
            },
            None => TokenKind::Placeholder {
                path: trimmed.to_string(),
            },
        }
    }

    /// The path the token resolves, if it resolves one
    pub fn path(&self) -> &str {
        match self {
            TokenKind::Placeholder { path } | TokenKind::BlockEnd { path } => path,
            TokenKind::Command { keyword, .. } => keyword,
        }
    }
}

/// A `{{...}}` token found in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte position of `{{`
    pub start: usize,
    /// Length in bytes including both delimiters
    pub length: usize,
    /// Backslashes directly before `{{`
    pub backslash_count: usize,
}

impl Token {
    /// Odd backslash count: the token is literal text
    pub fn is_escaped(&self) -> bool {
        self.backslash_count % 2 == 1
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Span including the backslashes in front of the token
    pub fn escape_start(&self) -> usize {
        self.start - self.backslash_count
    }
}

/// Scanner state
///
/// ```text
/// Normal --{--> SeenLBrace --{--> InToken --}--> SeenRBrace --}--> token, Normal
/// ```
///
/// Any other byte falls back one state; the byte is then reprocessed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    Normal {
        backslash_count: usize,
    },
    SeenLBrace {
        pos: usize,
        backslash_count: usize,
    },
    InToken {
        start: usize,
        backslash_count: usize,
    },
    SeenRBrace {
        start: usize,
        rbrace_pos: usize,
        backslash_count: usize,
    },
}

/// Iterator over the tokens of a text
pub struct TokenStream<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
    steps: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal { backslash_count: 0 },
            steps: 0,
        }
    }

    /// Bytes examined so far, reprocessed bytes included
    #[cfg(test)]
    pub(crate) fn steps(&self) -> usize {
        self.steps
    }

    fn content_start(start: usize) -> usize {
        start + 2
    }

    /// Advance one step; returns a finished token if this byte closed one
    fn step(&mut self, byte: u8) -> Option<Token> {
        match self.state.clone() {
            ScanState::Normal { backslash_count } => {
                self.state = match byte {
                    b'\\' => ScanState::Normal {
                        backslash_count: backslash_count + 1,
                    },
                    b'{' => ScanState::SeenLBrace {
                        pos: self.pos,
                        backslash_count,
                    },
                    _ => ScanState::Normal { backslash_count: 0 },
                };
                self.pos += 1;
                None
            }
            ScanState::SeenLBrace {
                pos,
                backslash_count,
            } => {
                if byte == b'{' {
                    self.state = ScanState::InToken {
                        start: pos,
                        backslash_count,
                    };
                    self.pos += 1;
                } else {
                    self.state = ScanState::Normal { backslash_count: 0 };
                }
                None
            }
            ScanState::InToken {
                start,
                backslash_count,
            } => {
                if byte == b'}' {
                    self.state = ScanState::SeenRBrace {
                        start,
                        rbrace_pos: self.pos,
                        backslash_count,
                    };
                }
                self.pos += 1;
                None
            }
            ScanState::SeenRBrace {
                start,
                rbrace_pos,
                backslash_count,
            } => {
                if byte != b'}' {
                    self.state = ScanState::InToken {
                        start,
                        backslash_count,
                    };
                    return None;
                }

                let content = std::str::from_utf8(&self.bytes[Self::content_start(start)..rbrace_pos])
                    .unwrap_or("");
                let token = Token {
                    kind: TokenKind::classify(content),
                    start,
                    length: self.pos + 1 - start,
                    backslash_count,
                };
                self.state = ScanState::Normal { backslash_count: 0 };
                self.pos += 1;
                Some(token)
            }
        }
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        // Every byte is examined at most twice
        let max_steps = self.bytes.len().saturating_mul(2) + 1;

        while self.pos < self.bytes.len() && self.steps < max_steps {
            self.steps += 1;
            let byte = self.bytes[self.pos];
            if let Some(token) = self.step(byte) {
                return Some(token);
            }
        }
        None
    }
}

/// All unescaped tokens of `text`
pub fn active_tokens(text: &str) -> impl Iterator<Item = Token> + '_ {
    TokenStream::new(text).filter(|t| !t.is_escaped())
}
