use crate::{
    DigitGroup, Error, FsSink, IdBuffer, MemorySink, Result, ShardLayout, ShardSink, ShardWriter,
    Shuffler, WriteSummary, WriterState, synthesize,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

fn buffer_of(n: u32) -> IdBuffer {
    IdBuffer::from((0..n).map(|v| v * 7 + 1).collect::<Vec<_>>())
}

fn write_to_memory(ids_per_file: usize, buffer: &IdBuffer) -> (Result<WriteSummary>, MemorySink) {
    let mut sink = MemorySink::new();
    let mut writer = ShardWriter::new(ShardLayout::new(ids_per_file));
    let result = writer.write(&mut sink, Path::new("ids"), buffer);
    (result, sink)
}

fn p(parts: &[&str]) -> PathBuf {
    parts.iter().collect()
}

/// Sink that fails the `n`th file write.
struct FailingSink {
    inner: MemorySink,
    fail_at: usize,
    writes: usize,
}

impl ShardSink for FailingSink {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        self.inner.create_dir(path)
    }

    fn write_ids(&mut self, path: &Path, ids: &[u32]) -> Result<()> {
        self.writes += 1;
        if self.writes == self.fail_at {
            return Err(Error::CreateFile {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.inner.write_ids(path, ids)
    }
}

#[test]
fn empty_buffer_creates_only_the_root() {
    let (result, sink) = write_to_memory(4, &IdBuffer::default());
    assert_eq!(
        result.unwrap(),
        WriteSummary {
            directories: 1,
            files: 0,
            ids: 0
        }
    );
    assert_eq!(sink.dirs(), &[p(&["ids"])]);
    assert!(sink.files().is_empty());
}

#[test]
fn concatenated_files_reproduce_the_buffer() {
    let buffer = buffer_of(53);
    let (result, sink) = write_to_memory(4, &buffer);
    let summary = result.unwrap();

    assert_eq!(summary.ids, 53);
    assert_eq!(summary.files, 14);
    assert_eq!(sink.concat(), buffer.as_slice());

    let sizes: Vec<usize> = sink.files().iter().map(|(_, ids)| ids.len()).collect();
    assert!(sizes[..13].iter().all(|&n| n == 4));
    assert_eq!(sizes[13], 53 % 4);
}

#[test]
fn files_are_named_in_nested_order() {
    let (result, sink) = write_to_memory(2, &buffer_of(23));
    result.unwrap();

    let names: Vec<&PathBuf> = sink.files().iter().map(|(path, _)| path).collect();
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], &p(&["ids", "a", "a", "id_aa0"]));
    assert_eq!(names[9], &p(&["ids", "a", "a", "id_aa9"]));
    assert_eq!(names[10], &p(&["ids", "a", "b", "id_ab0"]));
    assert_eq!(names[11], &p(&["ids", "a", "b", "id_ab1"]));
    assert_eq!(sink.files()[11].1.len(), 1);
}

#[test]
fn exact_multiple_stops_without_empty_directories() {
    // 20 ids, 2 per file: exactly one full leaf directory
    let (result, sink) = write_to_memory(2, &buffer_of(20));
    let summary = result.unwrap();

    assert_eq!(summary.files, 10);
    assert_eq!(sink.files().last().unwrap().1.len(), 2);
    assert_eq!(
        sink.dirs(),
        &[p(&["ids"]), p(&["ids", "a"]), p(&["ids", "a", "a"])]
    );
    assert_eq!(summary.directories, 3);
}

#[test]
fn crosses_into_next_first_level_directory() {
    // one id per file: 260 files fill `a/*`, the 261st opens `b/a`
    let (result, sink) = write_to_memory(1, &buffer_of(261));
    let summary = result.unwrap();

    assert_eq!(summary.files, 261);
    assert_eq!(summary.directories, 1 + 1 + 26 + 1 + 1);
    assert_eq!(
        sink.files().last().unwrap().0,
        p(&["ids", "b", "a", "id_ba0"])
    );
    assert_eq!(sink.dirs().last().unwrap(), &p(&["ids", "b", "a"]));
}

#[test]
fn exhaustion_at_first_level_boundary_leaves_next_letter_alone() {
    // one id per file: 260 files fill `a/*` exactly
    let (result, sink) = write_to_memory(1, &buffer_of(260));
    let summary = result.unwrap();

    assert_eq!(summary.files, 260);
    assert_eq!(summary.directories, 1 + 1 + 26);
    assert_eq!(
        sink.files().last().unwrap().0,
        p(&["ids", "a", "z", "id_az9"])
    );
    assert_eq!(sink.dirs().last().unwrap(), &p(&["ids", "a", "z"]));
    assert!(!sink.dirs().contains(&p(&["ids", "b"])));
}

#[test]
fn full_tree_is_usable_to_the_last_slot() {
    let slots = ShardLayout::file_slots() as u32;
    let (result, sink) = write_to_memory(1, &buffer_of(slots));
    let summary = result.unwrap();

    assert_eq!(summary.files, slots as usize);
    assert_eq!(summary.directories, 1 + 26 + 26 * 26);
    assert_eq!(
        sink.files().last().unwrap().0,
        p(&["ids", "z", "z", "id_zz9"])
    );
}

#[test]
fn overflow_is_rejected_before_anything_is_created() {
    let slots = ShardLayout::file_slots() as u32;
    let mut sink = MemorySink::new();
    let mut writer = ShardWriter::new(ShardLayout::new(1));
    let err = writer
        .write(&mut sink, Path::new("ids"), &buffer_of(slots + 1))
        .unwrap_err();

    let slots = slots as usize;
    assert!(matches!(
        err,
        Error::LayoutOverflow { total, capacity } if total == slots + 1 && capacity == slots
    ));
    assert!(sink.dirs().is_empty());
    assert_eq!(writer.state(), &WriterState::Failed);
}

#[test]
fn existing_root_fails() {
    let mut sink = MemorySink::new();
    sink.create_dir(Path::new("ids")).unwrap();

    let mut writer = ShardWriter::new(ShardLayout::new(4));
    let err = writer
        .write(&mut sink, Path::new("ids"), &buffer_of(9))
        .unwrap_err();

    assert!(matches!(err, Error::CreateDir { ref path, .. } if path == Path::new("ids")));
    assert!(sink.files().is_empty());
    assert_eq!(writer.state(), &WriterState::Failed);
}

#[test]
fn file_failure_aborts_and_keeps_partial_output() {
    let mut sink = FailingSink {
        inner: MemorySink::new(),
        fail_at: 3,
        writes: 0,
    };
    let mut writer = ShardWriter::new(ShardLayout::new(2));
    let err = writer
        .write(&mut sink, Path::new("ids"), &buffer_of(20))
        .unwrap_err();

    assert!(matches!(err, Error::CreateFile { ref path, .. } if path.ends_with("id_aa2")));
    assert_eq!(sink.inner.files().len(), 2);
    assert_eq!(sink.writes, 3);
    assert_eq!(writer.state(), &WriterState::Failed);
}

#[test]
fn state_transitions_to_done() {
    let mut writer = ShardWriter::new(ShardLayout::new(3));
    assert_eq!(writer.state(), &WriterState::NotStarted);
    writer
        .write(MemorySink::new(), Path::new("ids"), &buffer_of(7))
        .unwrap();
    assert_eq!(writer.state(), &WriterState::Done);
}

#[test]
fn shuffled_pipeline_round_trips_through_the_filesystem() {
    let group = DigitGroup::from_range(1..3);
    let buffer = Shuffler::from_seed(11).shuffle(synthesize(&group, &group).unwrap());

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("ids");
    let mut writer = ShardWriter::new(ShardLayout::new(3));
    let summary = writer.write(FsSink, &root, &buffer).unwrap();
    assert_eq!(summary.files, 3);

    let mut restored = Vec::new();
    for name in ["id_aa0", "id_aa1", "id_aa2"] {
        let bytes = fs::read(root.join("a").join("a").join(name)).unwrap();
        assert_eq!(bytes.len() % 4, 0);
        restored.extend(
            bytes
                .chunks_exact(4)
                .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]])),
        );
    }
    assert_eq!(restored, buffer.as_slice());
    assert!(!root.join("a").join("a").join("id_aa3").exists());
    assert!(!root.join("a").join("b").exists());
}
