//! Crate-level unit and behaviour tests.

mod behaviour;
mod unit;

/// A small interop class used across the suites.
pub(super) const NATIVE_CLASS: &str = "\
using System.Runtime.InteropServices;

namespace Demo
{
    internal static partial class Native
    {
        // Shows a message box.
        [DllImport(\"user32.dll\", CharSet = CharSet.Unicode)]
        public static extern int MessageBox(IntPtr hWnd, string text, string caption, uint type);

        private const int Ok = 0;
    }
}
";

/// Source exercising members the parser keeps opaque.
pub(super) const MIXED_MEMBERS: &str = "\
namespace Demo;

public delegate void Callback(int value);

public enum Mode { Fast, Slow };

public sealed class Widget<T> : IDisposable where T : class
{
    private readonly int[] values = { 1, 2, 3 };
    public int Count { get; private set; } = 3;
    public string Name => $\"widget {Count}\";
    public event EventHandler? Changed;
    public Widget() : this(0) { }
    public Widget(int seed) { Count = seed; }
    public void Dispose() => Changed = null;
    public static (int Low, int High) Range<TValue>(TValue value) where TValue : new() => (0, 1);
    ~Widget() { }
}
";

/// Looks up a named source used by the behaviour suite.
pub(super) fn fixture_source(name: &str) -> &'static str {
    match name {
        "native class" => NATIVE_CLASS,
        "mixed members" => MIXED_MEMBERS,
        "unterminated class" => "class Broken\n{\n    static extern void M();\n",
        "one-line class" => "class C { static extern void M(); }",
        other => panic!("unknown fixture source '{other}'"),
    }
}
