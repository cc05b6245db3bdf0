use crate::{BuildError, Paging, Result, Schema, SchemaMember, Sorting};

pub trait Parse {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized;
}

/// Schema text: `Name, Role{Name}, Members:1/10(~Name){*, !Notes}`.
///
/// Members are comma separated, `*` selects every simplex member, `!name` excludes one, braces
/// hold the schema of a navigation, `:size` or `:index/size` pages a one-to-many member and the
/// parenthesized list sorts it (`~` for descending).
impl Parse for Schema {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let mut parser = Parser {
            input: value.as_ref(),
            position: 0,
        };
        let result = parser.schema()?;
        parser.skip_whitespace();
        if parser.position < parser.input.len() {
            return Err(parser.error("unexpected trailing text"));
        }
        Ok(result)
    }
}

impl Parse for Sorting {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        match value.strip_prefix('~') {
            Some(member) => Ok(Sorting::descending(member.trim())),
            None => Ok(Sorting::ascending(value)),
        }
    }
}

impl Parse for Paging {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        let number = |v: &str| -> Result<u32> {
            v.trim().parse::<u32>().map_err(|_| {
                BuildError::InvalidSchema {
                    position: 0,
                    message: format!("`{}` is not a valid page number", v),
                }
                .into()
            })
        };
        match value.split_once('/') {
            Some((index, size)) => Ok(Paging::page(number(index)?, number(size)?)),
            None => Ok(Paging::limit(number(value)?)),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> crate::Error {
        BuildError::InvalidSchema {
            position: self.position,
            message: message.to_owned(),
        }
        .into()
    }
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.position += c.len_utf8();
        }
    }
    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }
    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{}`", expected)))
        }
    }
    /// Text up to (excluded) the first of the stop characters.
    fn until(&mut self, stop: &[char]) -> &'a str {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if stop.contains(&c) {
                break;
            }
            self.position += c.len_utf8();
        }
        self.input[start..self.position].trim_end()
    }
    fn name(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            self.position += c.len_utf8();
        }
        if start == self.position {
            return Err(self.error("expected a member name"));
        }
        Ok(&self.input[start..self.position])
    }

    fn schema(&mut self) -> Result<Schema> {
        let mut result = Schema::new();
        self.skip_whitespace();
        if self.position >= self.input.len() || self.peek() == Some('}') {
            return Ok(result);
        }
        loop {
            if self.eat('*') {
                result.wildcard = true;
            } else if self.eat('!') {
                let name = self.name()?;
                result.excluded.push(name.to_owned());
            } else {
                result.add(self.member()?);
            }
            if !self.eat(',') {
                break;
            }
        }
        Ok(result)
    }

    fn member(&mut self) -> Result<SchemaMember> {
        let mut member = SchemaMember::new(self.name()?);
        if self.eat(':') {
            let paging = self.until(&['(', '{', ',', '}']);
            member.paging = Some(Paging::parse(paging).map_err(|_| self.error("invalid paging"))?);
        }
        if self.eat('(') {
            loop {
                let sorting = self.until(&[',', ')']);
                if sorting.is_empty() || sorting == "~" {
                    return Err(self.error("expected a sorting member"));
                }
                member.sorting.push(Sorting::parse(sorting)?);
                if !self.eat(',') {
                    break;
                }
            }
            self.expect(')')?;
        }
        if self.eat('{') {
            member.schema = Some(self.schema()?);
            self.expect('}')?;
        }
        Ok(member)
    }
}
