use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use mutil::actions::cover::{backup_path, BACKUP_DIR};
use mutil::utils::batch::{BatchRunner, FailurePolicy, Status};
use mutil::{Action, ActionSet, EncodeJob, Encoder, MutilError, Processor, Result, TagReader, Tags};

struct FixedTags(Tags);

impl TagReader for FixedTags {
    fn read_tags(&self, _path: &Path) -> Result<Tags> {
        Ok(self.0.clone())
    }
}

/// Writes a marked copy of the input, the way ffmpeg would write a new file.
#[derive(Clone, Default)]
struct CopyEncoder {
    jobs: Arc<Mutex<Vec<EncodeJob>>>,
    fail: bool,
}

impl Encoder for CopyEncoder {
    fn encode(&self, job: &EncodeJob) -> Result<()> {
        self.jobs.lock().unwrap().push(job.clone());
        let mut data = b"encoded:".to_vec();
        data.extend(fs::read(&job.input)?);
        fs::write(&job.output, data)?;
        if self.fail {
            return Err(MutilError::EncoderSpawn {
                program: "fake".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
            });
        }
        Ok(())
    }
}

fn test_tags() -> Tags {
    Tags {
        title: Some("Test Song".into()),
        album: Some("Test Album".into()),
        artist: Some("Test Artist".into()),
        track: Some("1/12".into()),
    }
}

fn processor(actions: Vec<Action>, tags: Tags, encoder: &CopyEncoder) -> Processor {
    Processor::new(
        ActionSet::new(actions).unwrap(),
        Box::new(FixedTags(tags)),
        Box::new(encoder.clone()),
    )
}

fn song_in(dir: &Path) -> PathBuf {
    let path = dir.join("songfile.mp3");
    fs::write(&path, b"original audio").unwrap();
    path
}

#[test]
fn rename_uses_track_and_title() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let result = processor(vec![Action::Rename], test_tags(), &encoder)
        .process(&song)
        .unwrap();

    assert_eq!(result, dir.path().join("01_Test_Song.mp3"));
    assert!(result.is_file());
    assert!(!song.exists());
}

#[test]
fn sort_then_rename() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let library = dir.path().join("library");
    let encoder = CopyEncoder::default();

    let result = processor(
        vec![Action::Rename, Action::Sort(library.clone())],
        test_tags(),
        &encoder,
    )
    .process(&song)
    .unwrap();

    assert_eq!(
        result,
        library.join("test_artist").join("test_album").join("01_Test_Song.mp3")
    );
    assert_eq!(fs::read(&result).unwrap(), b"original audio");
}

#[test]
fn rename_collision_leaves_both_files() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let taken = dir.path().join("01_Test_Song.mp3");
    fs::write(&taken, b"someone else").unwrap();
    let encoder = CopyEncoder::default();

    let err = processor(vec![Action::Rename], test_tags(), &encoder)
        .process(&song)
        .unwrap_err();

    assert!(matches!(err, MutilError::AlreadyExists(p) if p == taken));
    assert_eq!(fs::read(&song).unwrap(), b"original audio");
    assert_eq!(fs::read(&taken).unwrap(), b"someone else");
}

#[test]
fn untagged_file_cannot_be_renamed() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let err = processor(vec![Action::Rename], Tags::default(), &encoder)
        .process(&song)
        .unwrap_err();

    assert!(matches!(err, MutilError::InsufficientMetadata(_)));
    assert!(song.is_file());
}

#[test]
fn transcode_writes_new_file_and_keeps_source() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let result = processor(vec![Action::Transcode("opus".into())], test_tags(), &encoder)
        .process(&song)
        .unwrap();

    assert_eq!(result, song);
    assert!(song.is_file());
    let output = dir.path().join("songfile.ogg");
    assert!(output.is_file());

    let jobs = encoder.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input, song);
    assert_eq!(jobs[0].output, output);
    assert!(jobs[0].args.contains(&"libopus".to_string()));
}

#[test]
fn transcode_never_overwrites() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    fs::write(dir.path().join("songfile.ogg"), b"earlier").unwrap();
    let encoder = CopyEncoder::default();

    let err = processor(vec![Action::Transcode("opus".into())], test_tags(), &encoder)
        .process(&song)
        .unwrap_err();

    assert!(matches!(err, MutilError::AlreadyExists(_)));
    assert!(encoder.jobs.lock().unwrap().is_empty());
    assert_eq!(fs::read(dir.path().join("songfile.ogg")).unwrap(), b"earlier");
}

#[test]
fn transcode_to_own_format_is_a_collision() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let err = processor(vec![Action::Transcode("mp3-320".into())], test_tags(), &encoder)
        .process(&song)
        .unwrap_err();

    assert!(matches!(err, MutilError::AlreadyExists(p) if p == song));
}

#[test]
fn cover_strip_keeps_backup() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let result = processor(vec![Action::RemoveCover], test_tags(), &encoder)
        .process(&song)
        .unwrap();

    assert_eq!(result, song);
    assert_eq!(fs::read(&song).unwrap(), b"encoded:original audio");
    let backup = dir.path().join(BACKUP_DIR).join("songfile.mp3");
    assert_eq!(backup_path(&song), backup);
    assert_eq!(fs::read(&backup).unwrap(), b"original audio");
    assert!(!dir.path().join("temp.songfile.mp3").exists());

    let jobs = encoder.jobs.lock().unwrap();
    assert_eq!(jobs[0].args, vec!["-c:a", "copy", "-vn"]);
}

#[test]
fn cover_strip_with_existing_backup_cleans_up() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let backup = backup_path(&song);
    fs::create_dir_all(backup.parent().unwrap()).unwrap();
    fs::write(&backup, b"older backup").unwrap();
    let encoder = CopyEncoder::default();

    let err = processor(vec![Action::RemoveCover], test_tags(), &encoder)
        .process(&song)
        .unwrap_err();

    assert!(matches!(err, MutilError::AlreadyExists(p) if p == backup));
    assert!(!dir.path().join("temp.songfile.mp3").exists());
    assert_eq!(fs::read(&song).unwrap(), b"original audio");
    assert_eq!(fs::read(&backup).unwrap(), b"older backup");
}

#[test]
fn failed_encode_removes_temp_file() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder {
        fail: true,
        ..CopyEncoder::default()
    };

    let err = processor(
        vec![Action::RemoveCover, Action::Transcode("opus".into())],
        test_tags(),
        &encoder,
    )
    .process(&song)
    .unwrap_err();

    assert!(matches!(err, MutilError::EncoderSpawn { .. }));
    assert!(!dir.path().join("temp.songfile.mp3").exists());
    assert!(!backup_path(&song).exists());
    assert_eq!(fs::read(&song).unwrap(), b"original audio");
    // the failure stops the remaining steps for this file
    assert_eq!(encoder.jobs.lock().unwrap().len(), 1);
}

#[test]
fn later_steps_follow_the_moved_file() {
    let dir = tempdir().unwrap();
    let song = song_in(dir.path());
    let encoder = CopyEncoder::default();

    let result = processor(
        vec![Action::Rename, Action::RemoveCover, Action::Transcode("opus".into())],
        test_tags(),
        &encoder,
    )
    .process(&song)
    .unwrap();

    let renamed = dir.path().join("01_Test_Song.mp3");
    assert_eq!(result, renamed);
    assert!(dir.path().join(BACKUP_DIR).join("01_Test_Song.mp3").is_file());
    assert!(dir.path().join("01_Test_Song.ogg").is_file());
    let jobs = encoder.jobs.lock().unwrap();
    assert!(jobs.iter().all(|job| job.input == renamed));
}

#[test]
fn keep_going_reports_each_file() {
    let dir = tempdir().unwrap();
    let good = song_in(dir.path());
    let missing = dir.path().join("missing.mp3");
    let encoder = CopyEncoder::default();
    let processor = processor(vec![Action::Rename], test_tags(), &encoder);

    let summary = BatchRunner::new(1, FailurePolicy::KeepGoing)
        .run(&[missing.clone(), good], |path| processor.process(path))
        .unwrap();

    assert_eq!(summary.outcomes[0].status, Status::Failed);
    assert_eq!(summary.outcomes[1].status, Status::Ok);
    assert_eq!(
        summary.outcomes[1].output.as_deref(),
        Some(dir.path().join("01_Test_Song.mp3").as_path())
    );
}

#[test]
fn parallel_workers_never_clobber() {
    let dir = tempdir().unwrap();
    let files: Vec<PathBuf> = (0..8)
        .map(|i| {
            let path = dir.path().join(format!("copy{}.mp3", i));
            fs::write(&path, format!("audio {}", i)).unwrap();
            path
        })
        .collect();
    let encoder = CopyEncoder::default();
    // every file derives the same name, so exactly one may win
    let processor = processor(vec![Action::Rename], test_tags(), &encoder);

    let summary = BatchRunner::new(4, FailurePolicy::KeepGoing)
        .run(&files, |path| processor.process(path))
        .unwrap();

    assert_eq!(summary.count(Status::Ok), 1);
    assert_eq!(summary.count(Status::Failed), 7);
    let remaining = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(remaining, 8);
}
