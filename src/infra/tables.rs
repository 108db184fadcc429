//! Process-wide lookup tables used by the refinement pipeline.
//!
//! All tables are immutable and initialized once on first use. Nothing in
//! here is configurable at runtime: the pipeline's grouping and naming
//! behavior must be deterministic for identical input.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Top-level module names that ship with the Python interpreter.
///
/// Used both to classify imports into the Standard group and to exclude
/// built-ins from the generated requirements manifest.
pub static PY_STDLIB: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abc",
        "argparse",
        "array",
        "ast",
        "asyncio",
        "base64",
        "bisect",
        "calendar",
        "collections",
        "concurrent",
        "contextlib",
        "copy",
        "csv",
        "datetime",
        "decimal",
        "difflib",
        "enum",
        "errno",
        "fnmatch",
        "functools",
        "gc",
        "glob",
        "gzip",
        "hashlib",
        "heapq",
        "hmac",
        "html",
        "http",
        "importlib",
        "inspect",
        "io",
        "itertools",
        "json",
        "logging",
        "math",
        "multiprocessing",
        "operator",
        "os",
        "pathlib",
        "pickle",
        "platform",
        "pprint",
        "queue",
        "random",
        "re",
        "shutil",
        "signal",
        "socket",
        "sqlite3",
        "ssl",
        "statistics",
        "string",
        "struct",
        "subprocess",
        "sys",
        "tempfile",
        "threading",
        "time",
        "timeit",
        "tk",
        "tkinter",
        "traceback",
        "ttk",
        "types",
        "typing",
        "uuid",
        "warnings",
        "weakref",
        "xml",
        "xmlrpc",
        "zipfile",
        "zlib",
    ]
    .into_iter()
    .collect()
});

/// Conventional import aliases mapped to the distribution name published
/// on PyPI. Generated code imports `np`, a requirements file needs `numpy`.
pub static ALIAS_TO_PYPI: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("bs4", "beautifulsoup4"),
        ("sklearn", "scikit-learn"),
        ("PIL", "pillow"),
        ("cv2", "opencv-python"),
        ("pygame", "pygame"),
        ("np", "numpy"),
        ("pd", "pandas"),
        ("plt", "matplotlib"),
        ("tf", "tensorflow"),
        ("torch", "torch"),
        ("db", "sqlalchemy"),
    ]
    .into_iter()
    .collect()
});

/// Filler words ignored when deriving a filename from the prompt.
pub static FILENAME_STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "to", "in", "for", "of", "and", "with", "that", "write", "create",
        "implement", "python", "function", "class", "code",
    ]
    .into_iter()
    .collect()
});

/// Filler words ignored when deriving a project name from the prompt.
/// Deliberately a separate set: project names tolerate short glue words
/// the keyword tokenizer already drops by length.
pub static PROJECT_STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "and", "that", "with", "for", "create", "implement", "build", "make", "code",
        "write", "script", "program", "python",
    ]
    .into_iter()
    .collect()
});
