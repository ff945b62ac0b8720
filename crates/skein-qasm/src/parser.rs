//! Parser for the `OpenQASM` 2.0 subset understood by the router.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use skein_ir::{DependencyGraph, GateRecord, QubitId};

use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// A declared quantum or classical register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name.
    pub name: String,
    /// Number of bits in the register.
    pub size: u32,
    /// Index of the register's first bit in the flattened qubit space.
    pub offset: u32,
}

/// A parsed circuit: register declarations plus gates in program order.
///
/// Quantum registers are flattened in declaration order, so `qreg a[2];
/// qreg b[3];` yields logical qubits `a[0..2] = 0..2` and `b[0..3] = 2..5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCircuit {
    /// Included files, in order.
    pub includes: Vec<String>,
    /// Quantum registers.
    pub qregs: Vec<Register>,
    /// Classical registers.
    pub cregs: Vec<Register>,
    /// Gates in program order, with flattened qubit indices.
    pub gates: Vec<GateRecord>,
}

impl ParsedCircuit {
    /// Total declared qubit count over all quantum registers.
    pub fn num_qubits(&self) -> u32 {
        self.qregs.iter().map(|r| r.size).sum()
    }

    /// Build the dependency graph of the gates.
    pub fn dependency_graph(&self) -> ParseResult<DependencyGraph> {
        Ok(DependencyGraph::from_records(
            self.num_qubits(),
            self.gates.iter().cloned(),
        )?)
    }
}

/// Parse QASM 2.0 source into a [`ParsedCircuit`].
pub fn parse(source: &str) -> ParseResult<ParsedCircuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    Ok(parser.circuit)
}

/// Parser state.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Byte offsets of every newline, for line numbers in errors.
    newlines: Vec<usize>,
    /// Register lookup: name -> (is quantum, index into `qregs`/`cregs`).
    registers: FxHashMap<String, (bool, usize)>,
    circuit: ParsedCircuit,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source.
    fn new(source: &'a str) -> ParseResult<Self> {
        let newlines: Vec<usize> = source.match_indices('\n').map(|(i, _)| i).collect();
        let line_of = |offset: usize| newlines.partition_point(|&n| n < offset) + 1;

        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(ParseError::LexerError {
                        line: line_of(span.start),
                        message,
                    });
                }
            }
        }

        Ok(Self {
            source,
            tokens,
            pos: 0,
            newlines,
            registers: FxHashMap::default(),
            circuit: ParsedCircuit::default(),
        })
    }

    /// Line of the current token (or of the last one at end of input).
    fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.span.start);
        self.newlines.partition_point(|&n| n < offset) + 1
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a token of the same kind as `expected`.
    #[allow(clippy::needless_pass_by_value)]
    fn expect(&mut self, expected: Token) -> ParseResult<Token> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(found)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.expect(Token::Identifier(String::new()))? {
            Token::Identifier(name) => Ok(name),
            _ => unreachable!("expect() checked the token kind"),
        }
    }

    fn expect_int(&mut self) -> ParseResult<u64> {
        match self.expect(Token::IntLiteral(0))? {
            Token::IntLiteral(value) => Ok(value),
            _ => unreachable!("expect() checked the token kind"),
        }
    }

    fn parse_program(&mut self) -> ParseResult<()> {
        while !self.is_eof() {
            self.parse_statement()?;
        }
        Ok(())
    }

    fn parse_statement(&mut self) -> ParseResult<()> {
        let line = self.line();
        let Some(token) = self.advance() else {
            return Ok(());
        };

        match token {
            Token::OpenQasm => self.parse_version(),
            Token::Include => {
                let Token::StringLiteral(path) = self.expect(Token::StringLiteral(String::new()))?
                else {
                    unreachable!("expect() checked the token kind")
                };
                self.expect(Token::Semicolon)?;
                self.circuit.includes.push(path);
                Ok(())
            }
            Token::Qreg => self.parse_register(true),
            Token::Creg => self.parse_register(false),
            Token::Measure => {
                let qubit = self.parse_qubit_ref()?;
                self.expect(Token::Arrow)?;
                let clbit = self.parse_clbit_ref()?;
                self.expect(Token::Semicolon)?;
                self.circuit
                    .gates
                    .push(GateRecord::single("measure", qubit).with_classical(clbit));
                Ok(())
            }
            Token::Reset => {
                let qubit = self.parse_qubit_ref()?;
                self.expect(Token::Semicolon)?;
                self.circuit.gates.push(GateRecord::single("reset", qubit));
                Ok(())
            }
            Token::Barrier => {
                // Barriers order scheduling only; routing ignores them.
                while !self.consume(&Token::Semicolon) {
                    if self.advance().is_none() {
                        return Err(ParseError::UnexpectedEof("expected ;".into()));
                    }
                }
                Ok(())
            }
            Token::Gate | Token::Opaque | Token::If => Err(ParseError::Unsupported {
                line,
                what: format!("'{token}' statements"),
            }),
            Token::Identifier(name) => self.parse_gate(name, line),
            other => Err(ParseError::UnexpectedToken {
                line,
                expected: "statement".into(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_version(&mut self) -> ParseResult<()> {
        let line = self.line();
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => v,
            #[allow(clippy::cast_precision_loss)]
            Some(Token::IntLiteral(v)) => v as f64,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "version number".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("expected version".into())),
        };
        if !(2.0..3.0).contains(&version) {
            return Err(ParseError::InvalidVersion(version.to_string()));
        }
        self.expect(Token::Semicolon)?;
        Ok(())
    }

    fn parse_register(&mut self, quantum: bool) -> ParseResult<()> {
        let name = self.expect_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.expect_int()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        if self.registers.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        let size = u32::try_from(size).map_err(|_| ParseError::IndexOutOfBounds {
            register: name.clone(),
            index: size,
            size: u32::MAX,
        })?;

        let list = if quantum {
            &mut self.circuit.qregs
        } else {
            &mut self.circuit.cregs
        };
        let offset = list.iter().map(|r| r.size).sum();
        self.registers.insert(name.clone(), (quantum, list.len()));
        list.push(Register { name, size, offset });
        Ok(())
    }

    /// Parse `reg[index]` and return the register plus index.
    fn parse_indexed(&mut self, quantum: bool) -> ParseResult<(&Register, u32)> {
        let line = self.line();
        let name = self.expect_identifier()?;
        if !self.check(&Token::LBracket) {
            return Err(ParseError::Unsupported {
                line,
                what: format!("register-wide operand '{name}'"),
            });
        }
        self.expect(Token::LBracket)?;
        let index = self.expect_int()?;
        self.expect(Token::RBracket)?;

        let register = match self.registers.get(&name).copied() {
            Some((is_quantum, i)) if is_quantum == quantum => {
                if quantum {
                    &self.circuit.qregs[i]
                } else {
                    &self.circuit.cregs[i]
                }
            }
            _ => return Err(ParseError::UndefinedIdentifier(name)),
        };
        if index >= u64::from(register.size) {
            return Err(ParseError::IndexOutOfBounds {
                register: name,
                index,
                size: register.size,
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok((register, index as u32))
    }

    fn parse_qubit_ref(&mut self) -> ParseResult<QubitId> {
        let (register, index) = self.parse_indexed(true)?;
        Ok(QubitId(register.offset + index))
    }

    fn parse_clbit_ref(&mut self) -> ParseResult<String> {
        let (register, index) = self.parse_indexed(false)?;
        Ok(format!("{}[{index}]", register.name))
    }

    /// Parse `name(params)? a[i] (, b[j])* ;`.
    fn parse_gate(&mut self, name: String, line: usize) -> ParseResult<()> {
        let params = if self.consume(&Token::LParen) {
            Some(self.parse_param_text()?)
        } else {
            None
        };

        let mut operands = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_qubit_ref()?);
        }
        self.expect(Token::Semicolon)?;

        let mut record = match operands.as_slice() {
            &[target] => GateRecord::single(name, target),
            &[control, target] => GateRecord::controlled(name, control, target),
            _ => {
                return Err(ParseError::UnsupportedArity {
                    gate: name,
                    line,
                    got: operands.len(),
                });
            }
        };
        record.params = params;
        self.circuit.gates.push(record);
        Ok(())
    }

    /// Consume tokens up to the matching `)` and return the raw source text
    /// between the parentheses.
    fn parse_param_text(&mut self) -> ParseResult<String> {
        let start = self
            .tokens
            .get(self.pos)
            .map(|t| t.span.start)
            .ok_or_else(|| ParseError::UnexpectedEof("expected )".into()))?;
        let mut end = start;
        let mut depth = 1usize;

        loop {
            let Some(spanned) = self.tokens.get(self.pos) else {
                return Err(ParseError::UnexpectedEof("expected )".into()));
            };
            match spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        break;
                    }
                }
                Token::Semicolon => {
                    return Err(ParseError::UnexpectedToken {
                        line: self.line(),
                        expected: ")".into(),
                        found: ";".into(),
                    });
                }
                _ => {}
            }
            end = spanned.span.end;
            self.pos += 1;
        }

        Ok(self.source[start..end].trim().to_string())
    }
}
