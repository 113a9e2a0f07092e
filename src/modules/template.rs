// `{placeholder}` format strings

use crate::error::ModuleError;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Escaped(char),
    Placeholder(&'a str),
}

fn segments(format: &str) -> Result<Vec<Segment<'_>>, String> {
    let mut out = Vec::new();
    let mut rest = format;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push(Segment::Escaped('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Escaped('}'));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(format!("unmatched '}}' in format \"{}\"", format));
        } else {
            let close = tail
                .find('}')
                .ok_or_else(|| format!("unclosed '{{' in format \"{}\"", format))?;
            let name = tail[1..close].trim();
            if name.is_empty() || name.contains('{') {
                return Err(format!("bad placeholder in format \"{}\"", format));
            }
            out.push(Segment::Placeholder(name));
            rest = &tail[close + 1..];
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    Ok(out)
}

/// Check syntax and that every placeholder is one of `known`
pub fn check(format: &str, known: &[&str]) -> Result<(), String> {
    for segment in segments(format)? {
        if let Segment::Placeholder(name) = segment {
            if !known.contains(&name) {
                return Err(format!(
                    "unknown placeholder {{{}}}, expected one of: {}",
                    name,
                    known.join(", ")
                ));
            }
        }
    }
    Ok(())
}

/// Substitute placeholders, failing on any name `lookup` does not know
pub fn render(format: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, ModuleError> {
    let mut out = String::with_capacity(format.len());
    for segment in segments(format).map_err(ModuleError::Render)? {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Escaped(c) => out.push(c),
            Segment::Placeholder(name) => {
                let value = lookup(name)
                    .ok_or_else(|| ModuleError::Render(format!("no value for {{{}}}", name)))?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}
