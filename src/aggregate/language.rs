//! Fence language detection
//!
//! Maps a file path to the identifier placed after the opening fence of its
//! code block. Unknown files get an empty tag.

use std::path::Path;

/// Highlight identifier and the extensions (lowercase, no dot) that select it
struct FenceLanguage {
    highlight: &'static str,
    extensions: &'static [&'static str],
}

macro_rules! fence {
    ($highlight:literal, [$($ext:literal),*]) => {
        FenceLanguage {
            highlight: $highlight,
            extensions: &[$($ext),*],
        }
    };
}

const LANGUAGES: &[FenceLanguage] = &[
    // Systems
    fence!("rust", ["rs"]),
    fence!("go", ["go"]),
    fence!("c", ["c", "h"]),
    fence!("cpp", ["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
    fence!("zig", ["zig"]),
    // JVM
    fence!("java", ["java"]),
    fence!("kotlin", ["kt", "kts"]),
    fence!("scala", ["scala", "sc"]),
    fence!("groovy", ["groovy", "gradle"]),
    // Web
    fence!("javascript", ["js", "jsx", "mjs", "cjs"]),
    fence!("typescript", ["ts", "tsx", "mts", "cts"]),
    fence!("html", ["html", "htm"]),
    fence!("css", ["css"]),
    fence!("scss", ["scss", "sass"]),
    fence!("less", ["less"]),
    fence!("vue", ["vue"]),
    fence!("svelte", ["svelte"]),
    // Scripting
    fence!("python", ["py", "pyi", "pyw"]),
    fence!("ruby", ["rb", "rake", "gemspec"]),
    fence!("php", ["php", "phtml"]),
    fence!("perl", ["pl", "pm"]),
    fence!("lua", ["lua"]),
    fence!("r", ["r"]),
    // Shell
    fence!("shell", ["sh"]),
    fence!("bash", ["bash", "zsh"]),
    fence!("powershell", ["ps1", "psm1", "psd1"]),
    // Mobile and .NET
    fence!("swift", ["swift"]),
    fence!("objectivec", ["m", "mm"]),
    fence!("dart", ["dart"]),
    fence!("csharp", ["cs"]),
    fence!("fsharp", ["fs", "fsx"]),
    // Functional
    fence!("elixir", ["ex", "exs"]),
    fence!("erlang", ["erl", "hrl"]),
    fence!("haskell", ["hs"]),
    fence!("ocaml", ["ml", "mli"]),
    // Data and config
    fence!("sql", ["sql"]),
    fence!("json", ["json", "jsonc"]),
    fence!("yaml", ["yaml", "yml"]),
    fence!("toml", ["toml"]),
    fence!("xml", ["xml", "xsd", "xsl"]),
    fence!("markdown", ["md", "markdown"]),
    fence!("ini", ["ini", "cfg"]),
    fence!("protobuf", ["proto"]),
    fence!("graphql", ["graphql", "gql"]),
    // Other
    fence!("dockerfile", ["dockerfile"]),
    fence!("env", ["env"]),
    fence!("gitignore", ["gitignore"]),
];

/// Whole file names (lowercase) that carry no usable extension
const BY_NAME: &[(&str, &str)] = &[
    ("dockerfile", "dockerfile"),
    ("makefile", "makefile"),
    (".gitignore", "gitignore"),
    (".env", "env"),
];

/// Fence tag for `path`, or `""` when unknown
pub fn fence_language(path: &str) -> &'static str {
    let path = Path::new(path);

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        let lower = name.to_lowercase();
        if let Some((_, highlight)) = BY_NAME.iter().find(|(n, _)| *n == lower) {
            return *highlight;
        }
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| from_extension(&ext.to_lowercase()))
        .unwrap_or("")
}

fn from_extension(ext: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|lang| lang.extensions.contains(&ext))
        .map(|lang| lang.highlight)
        .unwrap_or("")
}
