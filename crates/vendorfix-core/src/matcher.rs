//! Substitution over raw file bytes, so targets need not be valid UTF-8.

use crate::error::{PatchError, Result};
use crate::types::{PatchDescriptor, PatchKind};
use log::{trace, warn};
use regex::bytes::{NoExpand, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub content: Vec<u8>,
    pub replacements: usize,
}

impl Substitution {
    pub fn changed(&self, original: &[u8]) -> bool {
        self.content != original
    }
}

pub fn compile_pattern(descriptor: &PatchDescriptor) -> Result<Regex> {
    build_regex(descriptor, &descriptor.matcher)
}

fn build_regex(descriptor: &PatchDescriptor, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| PatchError::InvalidPattern {
        description: descriptor.description.clone(),
        source,
    })
}

pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Rewrites every region of `content` the descriptor matches.
pub fn substitute(descriptor: &PatchDescriptor, content: &[u8]) -> Result<Substitution> {
    let substitution = match descriptor.kind {
        PatchKind::Literal => {
            if descriptor.matcher.is_empty() {
                Substitution {
                    content: content.to_vec(),
                    replacements: 0,
                }
            } else {
                let re = build_regex(descriptor, &regex::escape(&descriptor.matcher))?;
                Substitution {
                    replacements: re.find_iter(content).count(),
                    content: re
                        .replace_all(content, NoExpand(descriptor.replacement.as_bytes()))
                        .into_owned(),
                }
            }
        }
        PatchKind::Pattern => {
            let re = compile_pattern(descriptor)?;
            Substitution {
                replacements: re.find_iter(content).count(),
                content: re
                    .replace_all(content, descriptor.replacement.as_bytes())
                    .into_owned(),
            }
        }
    };

    trace!(
        "'{}' matched {} region(s)",
        descriptor.description,
        substitution.replacements
    );
    if substitution.replacements > 1 {
        warn!(
            "'{}' rewrote {} regions of {:?}, expected one",
            descriptor.description, substitution.replacements, descriptor.target
        );
    }

    Ok(substitution)
}
