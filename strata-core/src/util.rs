use crate::{BuildError, Data, Record, Result, Slot};
use std::borrow::Cow;

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Like `separated_by` but the callback can fail, the first error stops the iteration.
pub fn try_separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<()>
where
    F: FnMut(&mut String, T) -> Result<()>,
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v)?;
    }
    Ok(())
}

/// Case insensitive comparison used for every metadata and member name lookup.
pub fn same_name(lhs: &str, rhs: &str) -> bool {
    lhs.eq_ignore_ascii_case(rhs)
}

/// Split a dotted member path into its head segment and the remainder.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    }
}

/// Append a segment to a dotted path prefix.
pub fn join_path(prefix: &str, member: &str) -> String {
    if prefix.is_empty() {
        member.to_owned()
    } else {
        format!("{}.{}", prefix, member)
    }
}

/// Names of the `${name}` slots embedded in a text, in order of appearance.
pub fn slot_names(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start + 2..].find('}') else {
            break;
        };
        result.push(&rest[start + 2..start + 2 + end]);
        rest = &rest[start + 3 + end..];
    }
    result
}

/// Replace every `${name}` slot using the member with the same name in the record.
pub fn substitute_slots<'a>(text: &'a str, record: &Record) -> Result<Cow<'a, str>> {
    if !text.contains("${") {
        return Ok(Cow::Borrowed(text));
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + end];
        out.push_str(&rest[..start]);
        match record.find(name) {
            Some(Data::Value(value)) => out.push_str(&slot_text(value)),
            _ => {
                return Err(BuildError::UnresolvedPath {
                    entity: text.into(),
                    path: name.into(),
                }
                .into());
            }
        }
        rest = &rest[start + 3 + end..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

/// Replace the `${name}` slots already bound, the others are left in place.
pub fn fill_slots<'a>(text: &'a str, slots: &[Slot]) -> Cow<'a, str> {
    let mut result = Cow::Borrowed(text);
    for slot in slots {
        if let Some(value) = &slot.value {
            let pattern = format!("${{{}}}", slot.name);
            if result.contains(&pattern) {
                result = Cow::Owned(result.replace(&pattern, &slot_text(value)));
            }
        }
    }
    result
}

fn slot_text(value: &crate::Value) -> String {
    use crate::Value;
    match value {
        Value::Varchar(Some(v)) => v.clone(),
        Value::Int8(Some(v)) => v.to_string(),
        Value::Int16(Some(v)) => v.to_string(),
        Value::Int32(Some(v)) => v.to_string(),
        Value::Int64(Some(v)) => v.to_string(),
        Value::UInt8(Some(v)) => v.to_string(),
        Value::UInt16(Some(v)) => v.to_string(),
        Value::UInt32(Some(v)) => v.to_string(),
        Value::UInt64(Some(v)) => v.to_string(),
        Value::Uuid(Some(v)) => v.simple().to_string(),
        Value::Date(Some(v)) => format!("{:04}{:02}", v.year(), v.month() as u8),
        v => format!("{:?}", v),
    }
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}
