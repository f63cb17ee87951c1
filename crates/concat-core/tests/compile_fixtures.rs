//! End-to-end compilations against files on disk

use std::fs;
use std::path::Path;

use concat_core::{CompileOptions, ErrorKind, compile};
use concat_source_map::{SourceMap, SourceMapConsumer};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn run(code: &str, options: &CompileOptions) -> concat_core::Result<concat_core::CompileOutput> {
    pollster::block_on(compile(code, options))
}

#[test]
fn concatenates_prepends_and_appends_around_the_root() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.js", "console.log(0);");
    write(temp.path(), "b.js", "console.log(2);");

    let main = "//@prepend a.js\nconsole.log(1);\n//@append b.js";
    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let output = run(main, &options).unwrap();

    assert_eq!(
        output.code,
        "console.log(0);\nconsole.log(1);\nconsole.log(2);"
    );
    assert!(output.map.is_none());
}

#[test]
fn file_without_directives_only_loses_map_references() {
    let temp = TempDir::new().unwrap();
    let code = "let a = 1;\n//# sourceMappingURL=main.js.map\nlet b = 2;";
    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let output = run(code, &options).unwrap();

    assert_eq!(output.code, "let a = 1;\nlet b = 2;");
    assert!(output.map.is_none());
}

#[test]
fn emission_order_follows_directive_order() {
    let temp = TempDir::new().unwrap();
    for name in ["p1", "p2", "p3", "a1", "a2"] {
        write(temp.path(), &format!("{}.js", name), name);
    }

    let main = "//@append a1.js\n//@prepend p1.js, p2.js\nroot\n//@append a2.js\n//@prepend p3.js";
    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let output = run(main, &options).unwrap();

    assert_eq!(output.code, "p1\np2\np3\nroot\na1\na2");
}

#[test]
fn self_inclusion_fails_without_looping() {
    let temp = TempDir::new().unwrap();
    let main = "//@append main.js";
    write(temp.path(), "main.js", main);

    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let err = run(main, &options).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::SelfInclusion { .. }));
    assert_eq!(
        err.message(),
        "`main.js` can not be appended/prepended to itself"
    );
}

#[test]
fn cyclic_inclusion_fails_at_the_closing_directive() {
    let temp = TempDir::new().unwrap();
    let a = "//@prepend b.js\na();";
    write(temp.path(), "a.js", a);
    write(temp.path(), "b.js", "b();\n//@append a.js");

    let options = CompileOptions::new(temp.path().join("a.js"), temp.path().join("out.js"));
    let err = run(a, &options).unwrap_err();

    assert_eq!(
        err.message(),
        "`b.js` can not append/prepend the parent file `a.js`"
    );
    let location = err.location().unwrap();
    assert_eq!(location.file, temp.path().join("b.js"));
    assert_eq!(location.line, 2);
    assert_eq!(location.column, 1);
}

#[test]
fn missing_include_reports_the_directive_line() {
    let temp = TempDir::new().unwrap();
    let a = "one();\n\n//@append missing.js";
    let options = CompileOptions::new(temp.path().join("a.js"), temp.path().join("out.js"));
    let err = run(a, &options).unwrap_err();

    assert_eq!(err.message(), "Unable to find the included file `missing.js`");
    let location = err.location().unwrap();
    assert_eq!(location.file, temp.path().join("a.js"));
    assert_eq!(location.line, 3);
}

#[test]
fn empty_glob_names_the_pattern() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "notes.txt", "");

    let options = CompileOptions::new(temp.path().join("main.src"), temp.path().join("out.js"));
    let err = run("//@append *.js", &options).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::GlobNoMatch { pattern } if pattern == "*.js"));
    assert!(err.message().contains("`*.js`"));
}

#[test]
fn glob_includes_every_matching_script() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib/one.js", "one");
    write(temp.path(), "lib/two.js", "two");
    write(temp.path(), "lib/readme.md", "skip");

    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let output = run("//@prepend lib/*.js\nmain", &options).unwrap();

    let lines: Vec<&str> = output.code.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"one"));
    assert!(lines.contains(&"two"));
    assert_eq!(lines[2], "main");
}

#[test]
fn absolute_glob_ignores_the_including_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib/a.js", "a");
    write(temp.path(), "src/b.js", "b");

    let lib = temp.path().join("lib");
    let main = format!("//@append {}/*.js\nmain", lib.display());
    let options = CompileOptions::new(temp.path().join("src/main.js"), temp.path().join("out.js"));
    let output = run(&main, &options).unwrap();

    assert_eq!(output.code, "main\na");
}

#[test]
fn partials_quotes_and_quiet() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "_vars.js", "vars");
    write(temp.path(), "lib/_helpers.js", "helpers");

    let main = "//@codekit-prepend quiet \"vars\", 'lib/helpers.js';\nmain";
    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let output = run(main, &options).unwrap();

    assert_eq!(output.code, "vars\nhelpers\nmain");
}

#[test]
fn nested_map_resolves_to_the_original_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "build/child.js", "one();\ntwo();");
    write(
        temp.path(),
        "build/child.js.map",
        r#"{"version":3,"file":"child.js","sources":["../orig/original.ts"],"names":[],"mappings":"AAAA;AACA"}"#,
    );

    let main = "//@append ../build/child.js\nmain();";
    let options = CompileOptions::new(
        temp.path().join("src/main.js"),
        temp.path().join("dist/out.js"),
    )
    .with_source_map(true);
    let output = run(main, &options).unwrap();

    assert_eq!(
        output.code,
        "main();\none();\ntwo();\n//# sourceMappingURL=out.js.map"
    );

    let map = SourceMap::from_json(&output.map.unwrap()).unwrap();
    assert_eq!(map.file.as_deref(), Some("out.js"));
    assert_eq!(map.sources, vec!["../src/main.js", "../orig/original.ts"]);

    let consumer = SourceMapConsumer::new(&map).unwrap();
    let main_line = consumer.mapping_at(0, 0).unwrap();
    assert_eq!((main_line.source, main_line.original_line), (0, 1));
    let one = consumer.mapping_at(1, 0).unwrap();
    assert_eq!((one.source, one.original_line), (1, 0));
    let two = consumer.mapping_at(2, 0).unwrap();
    assert_eq!((two.source, two.original_line), (1, 1));
}

#[test]
fn composed_output_can_be_included_again() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib/x.js", "x();");

    // First pass: lib/entry.js -> build/lib.js (+ map)
    let entry = "//@prepend x.js\nentry();";
    let options = CompileOptions::new(
        temp.path().join("lib/entry.js"),
        temp.path().join("build/lib.js"),
    )
    .with_source_map(true);
    let first = run(entry, &options).unwrap();
    write(temp.path(), "build/lib.js", &first.code);
    write(temp.path(), "build/lib.js.map", &first.map.unwrap());

    // Second pass includes the bundle; its lines still point at lib/
    let main = "//@append build/lib.js\nmain();";
    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"))
        .with_source_map(true);
    let second = run(main, &options).unwrap();

    assert_eq!(
        second.code,
        "main();\nx();\nentry();\n//# sourceMappingURL=out.js.map"
    );
    let map = SourceMap::from_json(&second.map.unwrap()).unwrap();
    assert_eq!(map.sources, vec!["main.js", "lib/x.js", "lib/entry.js"]);
}

#[test]
fn invalid_nested_map_is_ignored() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "child.js", "child();");
    write(temp.path(), "child.js.map", "{ definitely not a map");

    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"))
        .with_source_map(true);
    let output = run("//@append child.js\nmain();", &options).unwrap();

    let map = SourceMap::from_json(&output.map.unwrap()).unwrap();
    assert_eq!(map.sources, vec!["main.js", "child.js"]);
}

#[test]
fn nested_map_with_overflowing_mappings_is_ignored() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "child.js", "child();");
    let mappings = "ggggggggggggEAAA,".repeat(5);
    write(
        temp.path(),
        "child.js.map",
        &format!(
            r#"{{"version":3,"sources":["child.ts"],"names":[],"mappings":"{}"}}"#,
            mappings
        ),
    );

    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"))
        .with_source_map(true);
    let output = run("//@append child.js\nmain();", &options).unwrap();

    assert_eq!(
        output.code,
        "main();\nchild();\n//# sourceMappingURL=out.js.map"
    );
    let map = SourceMap::from_json(&output.map.unwrap()).unwrap();
    assert_eq!(map.sources, vec!["main.js", "child.js"]);
}

#[test]
fn errors_in_nested_files_keep_their_own_location() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib/a.js", "a();\n//@append gone.js");

    let options = CompileOptions::new(temp.path().join("main.js"), temp.path().join("out.js"));
    let err = run("//@append lib/a.js", &options).unwrap_err();

    let location = err.location().unwrap();
    assert_eq!(location.file, temp.path().join("lib/a.js"));
    assert_eq!(location.line, 2);
    assert_eq!(
        err.render(),
        format!(
            "{}:2:1: Unable to find the included file `gone.js`",
            temp.path().join("lib/a.js").display()
        )
    );
}
