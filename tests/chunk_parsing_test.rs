//! Integration tests for chunk parsing, selection and patch reconstruction.

use hunkcommit::diff::{
    HeaderMode, SelectionSet, count_hunks, parse_chunks, reconstruct, reconstruct_with,
};

const TWO_FILES: &str = "\
diff --git a/x.txt b/x.txt
--- a/x.txt
+++ b/x.txt
@@ -1,2 +1,2 @@
-old
+new
 ctx
diff --git a/y.txt b/y.txt
--- a/y.txt
+++ b/y.txt
@@ -1,1 +1,1 @@
-foo
+bar
";

const THREE_HUNKS: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,3 @@
 fn a() {}
-fn b() {}
+fn b() -> u8 { 0 }
 fn c() {}
@@ -20,3 +20,4 @@ impl Thing {
 fn d() {}
+fn e() {}
 fn f() {}

diff --git a/README.md b/README.md
index 3333333..4444444 100644
--- a/README.md
+++ b/README.md
@@ -5 +5 @@
-Old title
+New title
";

// =============================================================================
// ASSEMBLY
// =============================================================================

#[test]
fn test_two_file_scenario() {
    let chunks = parse_chunks(TWO_FILES);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].file_path, "x.txt");
    assert_eq!(chunks[0].hunk_header, "@@ -1,2 +1,2 @@");
    assert_eq!(chunks[0].lines, vec!["-old", "+new", " ctx"]);
    assert_eq!(chunks[1].file_path, "y.txt");
    assert_eq!(chunks[1].lines, vec!["-foo", "+bar"]);
}

#[test]
fn test_two_hunks_then_one() {
    let chunks = parse_chunks(THREE_HUNKS);

    let paths: Vec<&str> = chunks.iter().map(|c| c.file_path.as_str()).collect();
    assert_eq!(paths, vec!["src/lib.rs", "src/lib.rs", "README.md"]);
    assert_eq!(chunks[1].hunk_header, "@@ -20,3 +20,4 @@ impl Thing {");
    // The blank line before the next file block belongs to the hunk.
    assert_eq!(chunks[1].lines.last().map(String::as_str), Some(""));
}

#[test]
fn test_no_chunk_line_is_a_boundary() {
    for chunk in parse_chunks(THREE_HUNKS) {
        assert!(
            chunk
                .lines
                .iter()
                .all(|l| !l.starts_with("diff --git ") && !l.starts_with("@@ "))
        );
    }
}

#[test]
fn test_file_without_hunks_does_not_disturb_later_files() {
    let diff = "\
diff --git a/old.txt b/new.txt
similarity index 100%
rename from old.txt
rename to new.txt
diff --git a/mode.sh b/mode.sh
old mode 100644
new mode 100755
diff --git a/z.txt b/z.txt
--- a/z.txt
+++ b/z.txt
@@ -1 +1 @@
-1
+2
";
    let chunks = parse_chunks(diff);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].file_path, "z.txt");
}

#[test]
fn test_empty_input() {
    assert!(parse_chunks("").is_empty());
}

#[test]
fn test_content_is_byte_faithful() {
    let diff = "diff --git a/w.txt b/w.txt\n@@ -1 +1 @@\n-a  \r\n+\ta\t\n";
    let chunks = parse_chunks(diff);

    assert_eq!(chunks[0].lines, vec!["-a  \r", "+\ta\t"]);
}

// =============================================================================
// RECONSTRUCTION
// =============================================================================

#[test]
fn test_select_second_only() {
    let chunks = parse_chunks(TWO_FILES);
    let mut selection = SelectionSet::new(chunks.len());
    selection.toggle(1);

    let patch = reconstruct(&chunks, &selection);

    assert_eq!(
        patch,
        "diff --git a/y.txt b/y.txt\n--- a/y.txt\n+++ b/y.txt\n@@ -1,1 +1,1 @@\n-foo\n+bar\n"
    );
    assert!(!patch.contains("x.txt"));
}

#[test]
fn test_select_all_round_trips_hunks() {
    let chunks = parse_chunks(THREE_HUNKS);
    let mut selection = SelectionSet::new(chunks.len());
    selection.select_all();

    let patch = reconstruct(&chunks, &selection);
    let reparsed = parse_chunks(&patch);

    assert_eq!(reparsed, chunks);
}

#[test]
fn test_every_subset_has_matching_hunk_count() {
    let chunks = parse_chunks(THREE_HUNKS);

    for mask in 0u8..8 {
        let mut selection = SelectionSet::new(chunks.len());
        for i in 0..chunks.len() {
            if mask & (1 << i) != 0 {
                selection.toggle(i);
            }
        }

        let patch = reconstruct(&chunks, &selection);
        assert_eq!(count_hunks(&patch), selection.count(), "mask {mask:03b}");

        let headers: Vec<String> = parse_chunks(&patch)
            .into_iter()
            .map(|c| c.hunk_header)
            .collect();
        let expected: Vec<String> = selection
            .selected_indices()
            .map(|i| chunks[i].hunk_header.clone())
            .collect();
        assert_eq!(headers, expected, "mask {mask:03b}");
    }
}

#[test]
fn test_empty_selection_is_empty_patch() {
    let chunks = parse_chunks(THREE_HUNKS);
    let selection = SelectionSet::new(chunks.len());

    assert_eq!(reconstruct(&chunks, &selection), "");
}

#[test]
fn test_grouped_headers_share_one_block_per_file() {
    let chunks = parse_chunks(THREE_HUNKS);
    let mut selection = SelectionSet::new(chunks.len());
    selection.select_all();

    let grouped = reconstruct_with(&chunks, &selection, HeaderMode::Grouped);
    let per_chunk = reconstruct_with(&chunks, &selection, HeaderMode::PerChunk);

    assert_eq!(grouped.matches("diff --git ").count(), 2);
    assert_eq!(per_chunk.matches("diff --git ").count(), 3);
    assert_eq!(parse_chunks(&grouped), parse_chunks(&per_chunk));
}

// =============================================================================
// SELECTION
// =============================================================================

#[test]
fn test_double_toggle_restores_selection() {
    let mut selection = SelectionSet::new(3);
    selection.toggle(2);
    let before: Vec<usize> = selection.selected_indices().collect();

    selection.toggle(0);
    selection.toggle(0);

    assert_eq!(selection.selected_indices().collect::<Vec<_>>(), before);
}

#[test]
fn test_invert_vs_select_all() {
    let mut inverted = SelectionSet::new(3);
    inverted.toggle(1);
    inverted.toggle_all();
    assert_eq!(inverted.selected_indices().collect::<Vec<_>>(), vec![0, 2]);

    let mut all = SelectionSet::new(3);
    all.toggle(1);
    all.select_all();
    assert_eq!(all.count(), 3);
}
