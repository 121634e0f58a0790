//! Positional placeholder substitution.
//!
//! Templates use `{0}`, `{1}`, ... to reference values by zero-based
//! position; `{{` and `}}` produce literal braces. Substitution is all or
//! nothing: any out-of-range index or malformed placeholder aborts the
//! whole operation and no text is produced.

use thiserror::Error;

use crate::config::ParameterizeConfig;
use crate::traits::DbParameter;

/// Why a template could not be substituted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("placeholder {{{index}}} is out of range for {count} parameter(s)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("malformed placeholder at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },

    #[error("parameter {index} is never referenced by the query text")]
    UnreferencedValue { index: usize },
}

/// Replace every `{i}` in `template` with the name of the `i`-th parameter.
pub fn parameterize_query_text<P: DbParameter>(
    template: &str,
    parameters: &[P],
    config: &ParameterizeConfig,
) -> Result<String, TemplateError> {
    let names: Vec<&str> = parameters.iter().map(|p| p.name()).collect();
    format_positional(template, &names, config.requires_all_values_referenced())
}

/// Replace every `{i}` in `template` with `args[i]`.
///
/// With `require_all_referenced`, every argument must be referenced at
/// least once.
pub fn format_positional(
    template: &str,
    args: &[&str],
    require_all_referenced: bool,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + args.len() * 16);
    let mut referenced = vec![false; args.len()];
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let index = read_index(&mut chars, position)?;
                let arg = args.get(index).ok_or(TemplateError::IndexOutOfRange {
                    index,
                    count: args.len(),
                })?;
                referenced[index] = true;
                out.push_str(arg);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TemplateError::Malformed {
                        position,
                        reason: "unmatched '}'",
                    });
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    if require_all_referenced {
        if let Some(index) = referenced.iter().position(|r| !r) {
            return Err(TemplateError::UnreferencedValue { index });
        }
    }

    Ok(out)
}

/// Reads the digits and closing brace of a placeholder whose `{` sits at
/// `open`.
fn read_index<I>(
    chars: &mut std::iter::Peekable<I>,
    open: usize,
) -> Result<usize, TemplateError>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut digits = String::new();
    loop {
        match chars.next() {
            Some((_, d)) if d.is_ascii_digit() => digits.push(d),
            Some((_, '}')) => break,
            Some((_, ',' | ':')) => {
                return Err(TemplateError::Malformed {
                    position: open,
                    reason: "alignment and format specifiers are not supported",
                })
            }
            Some(_) => {
                return Err(TemplateError::Malformed {
                    position: open,
                    reason: "placeholder index must be a non-negative integer",
                })
            }
            None => {
                return Err(TemplateError::Malformed {
                    position: open,
                    reason: "unterminated placeholder",
                })
            }
        }
    }

    if digits.is_empty() {
        return Err(TemplateError::Malformed {
            position: open,
            reason: "empty placeholder",
        });
    }
    digits.parse().map_err(|_| TemplateError::Malformed {
        position: open,
        reason: "placeholder index is too large",
    })
}
