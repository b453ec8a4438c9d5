//! Crate-level unit and behaviour tests.


use interop_syntax::TextRange;

use crate::{Diagnostic, options::defaults::DEFAULT_DIAGNOSTIC_ID};

/// An interop class with convertible and non-convertible members.
pub(super) const NATIVE_METHODS: &str = "\
using System;
using System.Runtime.InteropServices;

namespace Demo
{
    internal static partial class Native
    {
        [DllImport(\"user32.dll\", CallingConvention = CallingConvention.StdCall, BestFitMapping = false)]
        public static extern int MessageBox(IntPtr hWnd, string text, string caption, uint type);

        [DllImport(\"kernel32.dll\", ThrowOnUnmappableChar = true)]
        public static extern bool Beep(uint frequency, uint duration);

        [Obsolete]
        public static extern void NoImport();

        [DllImport(\"kernel32.dll\")]
        public static void WithBody() { }

        [DllImport(\"a.dll\"), DllImport(\"b.dll\")]
        public static extern void Twice();
    }
}
";

/// A method whose modifiers are split by a conditional directive.
pub(super) const SPLIT_BY_DIRECTIVE: &str = "\
using System.Runtime.InteropServices;

class Native
{
    [DllImport(\"a.dll\")]
#if TRACE
    static extern void Beep();
#endif
}
";

/// A method preceded by a region directive.
pub(super) const IN_REGION: &str = "\
using System.Runtime.InteropServices;

class Native
{
    #region Imports
    [DllImport(\"a.dll\")]
    static extern void Beep();
    #endregion
}
";

/// A bodiless import that is already `partial` rather than `extern`.
pub(super) const NOT_EXTERN: &str = "\
using System.Runtime.InteropServices;

partial class Native
{
    [DllImport(\"a.dll\")]
    static partial void Beep();
}
";

/// A one-line class with an `extern` written first.
pub(super) const ONE_LINE: &str = "using System.Runtime.InteropServices;\n\
class Native { [DllImport(\"a.dll\")] extern static void Beep(); }\n";

/// Returns a named fixture source.
pub(super) fn fixture_source(name: &str) -> &'static str {
    match name {
        "native methods" => NATIVE_METHODS,
        "split by directive" => SPLIT_BY_DIRECTIVE,
        "in region" => IN_REGION,
        "one line" => ONE_LINE,
        "not extern" => NOT_EXTERN,
        other => panic!("unknown fixture source {other}"),
    }
}

/// Builds a diagnostic flagging the first occurrence of `needle`.
pub(super) fn diagnostic_at(source: &str, needle: &str) -> Diagnostic {
    let start = source
        .find(needle)
        .unwrap_or_else(|| panic!("{needle} not in source"));
    Diagnostic::new(
        DEFAULT_DIAGNOSTIC_ID,
        TextRange::new(start, start + needle.len()),
    )
}
