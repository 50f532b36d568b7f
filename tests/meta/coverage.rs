//! Tests that the unit suite mirrors the source tree

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SOURCE_ROOT: &str = "src";
    const UNIT_ROOT: &str = "tests/unit";

    /// Relative paths of every directory and `.rs` file below `root`
    fn tree(root: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        walk(root, root, &mut paths)?;
        Ok(paths)
    }

    fn walk(dir: &Path, root: &Path, paths: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(root)
                .map_err(|error| io::Error::other(error.to_string()))?
                .to_string_lossy()
                .into_owned();

            if path.is_dir() {
                paths.insert(relative);
                walk(&path, root, paths)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    fn is_wiring(path: &str) -> bool {
        path == "lib.rs" || path == "main.rs" || path.ends_with("mod.rs")
    }

    fn listing(paths: &[&String], from: &str, to: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {from}/{path} -> {to}/{path}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests each source file has a unit test file at the same relative path
    // Verified by deleting a unit test file
    #[test]
    fn test_every_source_file_has_unit_tests() {
        let sources = tree(Path::new(SOURCE_ROOT)).expect("source tree is readable");
        let units = tree(Path::new(UNIT_ROOT)).expect("unit tree is readable");

        let missing: Vec<&String> = sources
            .iter()
            .filter(|path| !is_wiring(path) && !units.contains(*path))
            .collect();

        assert!(
            missing.is_empty(),
            "source files without unit tests:\n{}",
            listing(&missing, SOURCE_ROOT, UNIT_ROOT)
        );
    }

    // Tests no unit test file outlives its source file
    // Verified by adding a unit test file for a removed module
    #[test]
    fn test_every_unit_test_has_a_source_file() {
        let sources = tree(Path::new(SOURCE_ROOT)).expect("source tree is readable");
        let units = tree(Path::new(UNIT_ROOT)).expect("unit tree is readable");

        let orphaned: Vec<&String> = units
            .iter()
            .filter(|path| !is_wiring(path) && !sources.contains(*path))
            .collect();

        assert!(
            orphaned.is_empty(),
            "unit tests without a source file:\n{}",
            listing(&orphaned, UNIT_ROOT, SOURCE_ROOT)
        );
    }

    // Tests every unit test file is declared in its directory's mod.rs
    // Verified by removing a declaration
    #[test]
    fn test_unit_files_are_compiled() {
        let units = tree(Path::new(UNIT_ROOT)).expect("unit tree is readable");

        let mut undeclared = Vec::new();
        for path in units.iter().filter(|path| path.ends_with(".rs") && !is_wiring(path)) {
            let file = Path::new(path);
            let module = file.file_stem().map(|stem| stem.to_string_lossy().into_owned());
            let parent = file.parent().unwrap_or_else(|| Path::new(""));
            let wiring = Path::new(UNIT_ROOT).join(parent).join("mod.rs");
            let declared = fs::read_to_string(&wiring).unwrap_or_default();

            let is_declared = module.is_some_and(|name| {
                declared
                    .lines()
                    .any(|line| line.trim().trim_start_matches("pub ") == format!("mod {name};"))
            });
            if !is_declared {
                undeclared.push(format!("  - {UNIT_ROOT}/{path}"));
            }
        }

        assert!(
            undeclared.is_empty(),
            "unit test files never compiled:\n{}",
            undeclared.join("\n")
        );
    }

    // Tests every test file holds at least one test
    // Verified by emptying a test file
    #[test]
    fn test_test_files_contain_tests() {
        let root = Path::new("tests");
        let files = tree(root).expect("tests tree is readable");

        let empty: Vec<String> = files
            .iter()
            .filter(|path| path.ends_with(".rs") && !path.ends_with("mod.rs"))
            .filter(|path| {
                fs::read_to_string(root.join(path))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "test files without a #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
