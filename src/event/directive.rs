/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Document directive handling: consuming the run of
//! %YAML/%TAG tokens ahead of a document, maintaining the
//! active handle->prefix map, and rewriting node tags
//! through it.

use atoi::atoi;

use crate::{
    event::{
        error::{ParseError as Error, ParseResult as Result},
        types::{Slice, TagDirective, DEFAULT_TAGS},
    },
    scan::Scan,
    token::{DirectiveKind, Mark, TokenData, TokenKind},
};

/// Consume all adjacent directive tokens from the stream,
/// rebuilding the .active tag list for the upcoming
/// document.
///
/// Returns the document's version string (if any) and the
/// emitted directive list: the %TAG directives the document
/// actually declared. The built in defaults are merged into
/// .active afterwards -- overridden handles keep the
/// document's prefix -- but never appear in the emitted
/// list.
pub(in crate::event) fn process_directives<'de, S>(
    scanner: &mut S,
    active: &mut Vec<TagDirective<'de>>,
) -> Result<(Option<Slice<'de>>, Vec<TagDirective<'de>>)>
where
    S: Scan<'de>,
{
    active.clear();
    let mut version = None;

    while scanner.check_token(&[TokenKind::Directive])?
    {
        let token = scanner.get_token()?;

        match token.data
        {
            TokenData::Directive {
                kind: DirectiveKind::Yaml,
                value,
                ..
            } =>
            {
                if version.is_some()
                {
                    return Err(Error::DuplicateVersion { mark: token.start });
                }

                check_version(&value, token.start)?;
                version = Some(value);
            },
            TokenData::Directive {
                kind: DirectiveKind::Tag,
                value,
                divider,
            } =>
            {
                let directive = split_tag_directive(value, divider);

                /*
                 * %TAG directives with the same handle are an error
                 *
                 * See:
                 *  yaml.org/spec/1.2.2/#682-tag-directives
                 */
                if active.iter().any(|d| d.handle == directive.handle)
                {
                    return Err(Error::DuplicateTagHandle {
                        handle: directive.handle.into_owned(),
                        mark:   token.start,
                    });
                }

                active.push(directive);
            },
            // Reserved directives are skipped silently
            TokenData::Directive { .. } =>
            {},
            _ => unreachable!(),
        }
    }

    let emitted = active.clone();

    // Merge any missing default directives back, so '!' and
    // '!!' stay resolvable, but do not overwrite overrides
    for default in DEFAULT_TAGS
    {
        if !active.iter().any(|d| d.handle == default.handle)
        {
            active.push(default);
        }
    }

    Ok((version, emitted))
}

/// Rewrite a node's raw tag into its fully substituted
/// form.
///
/// The raw .value splits at .divider into handle and
/// suffix. An empty handle is the verbatim (!<uri>) form
/// and passes through untouched; otherwise the handle must
/// appear in the .active list and is replaced by its
/// prefix.
pub(in crate::event) fn resolve_tag<'de>(
    active: &[TagDirective<'de>],
    value: Slice<'de>,
    divider: u32,
    node_mark: Mark,
    tag_mark: Mark,
) -> Result<Slice<'de>>
{
    let (handle, suffix) = split_slice(value, divider as usize);

    if handle.is_empty()
    {
        return Ok(suffix);
    }

    match active.iter().find(|d| d.handle == handle)
    {
        Some(directive) => Ok(Slice::Owned(format!("{}{}", directive.prefix, suffix))),
        None => Err(Error::UndefinedTagHandle {
            handle:       handle.into_owned(),
            context_mark: node_mark,
            mark:         tag_mark,
        }),
    }
}

/// Require the major component of a %YAML directive's
/// version string to be 1
fn check_version(value: &str, mark: Mark) -> Result<()>
{
    let major = value.split('.').next().unwrap_or("");

    match atoi::<u8>(major.as_bytes())
    {
        Some(1) => Ok(()),
        _ => Err(Error::IncompatibleVersion {
            version: value.to_string(),
            mark,
        }),
    }
}

fn split_tag_directive(value: Slice<'_>, divider: u32) -> TagDirective<'_>
{
    let (handle, prefix) = split_slice(value, divider as usize);

    TagDirective::new(handle, prefix)
}

/// Split a slice in two at .at, preserving borrows where
/// possible
fn split_slice(value: Slice<'_>, at: usize) -> (Slice<'_>, Slice<'_>)
{
    match value
    {
        Slice::Borrowed(s) => (Slice::Borrowed(&s[..at]), Slice::Borrowed(&s[at..])),
        Slice::Owned(s) => (Slice::Owned(s[..at].to_string()), Slice::Owned(s[at..].to_string())),
    }
}
