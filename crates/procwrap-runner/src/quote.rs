//! Joining a command vector into a single shell command line
//!
//! Only used by [`LaunchMode::Shell`](crate::LaunchMode::Shell). Arguments are
//! quoted so the shell hands each one back to the program unchanged; shell
//! features only apply to text the caller deliberately leaves unquoted by
//! packing it into a single token.

use std::borrow::Cow;

/// Join arguments with POSIX `sh` quoting.
#[must_use]
pub fn join_posix<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    shell_words::join(args)
}

/// Join arguments following the MSVC runtime parsing rules used by
/// `CommandLineToArgvW`: arguments containing whitespace or quotes are wrapped
/// in double quotes, embedded quotes are backslash-escaped and backslashes are
/// doubled only when they precede a quote.
#[must_use]
pub fn join_windows<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| quote_windows(arg.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_windows(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty() || arg.contains([' ', '\t', '\n', '"']);
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(ch);
                backslashes = 0;
            }
        }
    }
    // trailing backslashes would escape the closing quote
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Join arguments with the quoting rules of the host platform's shell.
#[must_use]
pub fn join_for_platform<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if cfg!(windows) {
        join_windows(args)
    } else {
        join_posix(args)
    }
}
