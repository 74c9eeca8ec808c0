//! Expansion of path templates such as `/{accountId}/users/{userId}{?withInteractions}`.
//!
//! `{name}` groups are required and substituted verbatim. A single `{?a,b,c}` group lists
//! optional query parameters: the template is cut at that group and every present parameter is
//! appended URL-encoded, in the order listed.
//!
//! The template is read once, left to right. Substituted values are never scanned again, so a
//! value that itself looks like a group ends up in the path unchanged.
use crate::{Error, Restriction, Result};

/// Expand `template` against the parameters of `restriction`.
///
/// Fails with [`Error::InvalidArgument`] listing every missing required parameter.
pub fn build(template: &str, restriction: &Restriction) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    // Set once the optional group is reached; nothing after it is emitted.
    let mut optional: Option<Vec<&str>> = None;
    let mut missing: Vec<&str> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let group = &after[..end];
        let emitting = optional.is_none();

        if emitting {
            path.push_str(&rest[..start]);
        }

        if let Some(names) = group.strip_prefix('?') {
            if emitting {
                optional = Some(names.split(',').filter(|name| !name.is_empty()).collect());
            }
        } else {
            match restriction.parameter(group) {
                Some(value) if emitting => path.push_str(value),
                Some(_) => {}
                None => missing.push(group),
            }
        }

        rest = &after[end + 1..];
    }

    if !missing.is_empty() {
        return Err(Error::invalid_argument(format!(
            "empty required parameters: {}",
            missing.join(", ")
        )));
    }

    let Some(optional) = optional else {
        path.push_str(rest);
        return Ok(path);
    };

    let mut delimiter = '?';
    for name in optional {
        if let Some(value) = restriction.parameter(name) {
            path.push(delimiter);
            path.push_str(name);
            path.push('=');
            path.push_str(&urlencoding::encode(value));
            delimiter = '&';
        }
    }

    Ok(path)
}
