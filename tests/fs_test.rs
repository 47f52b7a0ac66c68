use std::fs::File;
use std::io::{BufReader, Cursor, Write};

use flatfs::cmd::{run, ParseError, RunError};
use flatfs::layout::{BLOCK_COUNT, BLOCK_SIZE};

/// Three output characters per image byte.
const DUMP_LEN: usize = BLOCK_COUNT * BLOCK_SIZE * 3;

fn run_script(script: &str) -> Vec<u8> {
    let mut out = Vec::new();
    run(Cursor::new(script), &mut out).unwrap();
    out
}

#[test]
fn empty_log_dumps_the_formatted_image() {
    let out = run_script("");
    assert_eq!(out.len(), DUMP_LEN);

    // Superblock and unused bitmap tail are zero, the inode bitmap leads
    // with inodes 0-2 reserved, the data bitmap with the directory block.
    assert!(out[..BLOCK_SIZE * 3].chunks(3).all(|c| c == b"00 "));
    assert_eq!(&out[1 * BLOCK_SIZE * 3..1 * BLOCK_SIZE * 3 + 3], b"e0 ");
    assert_eq!(&out[2 * BLOCK_SIZE * 3..2 * BLOCK_SIZE * 3 + 3], b"80 ");
}

#[test]
fn replays_a_full_create_read_delete_session() {
    let script = "ab w 5000\nab w 1\nab r 5000\ncd r 1\nab d\nab r 5000\n";
    let out = run_script(script);

    let mut want = Vec::new();
    want.extend_from_slice(b"Already exists\n");
    want.extend_from_slice(&vec![b'a'; 5000]);
    want.extend_from_slice(b"\nNo such file\nNo such file\n");
    assert_eq!(&out[..want.len()], &want[..]);
    assert_eq!(out.len(), want.len() + DUMP_LEN);
}

#[test]
fn invalid_command_codes_abort_without_a_dump() {
    let mut out = Vec::new();
    let result = run(Cursor::new("ab w 10\nab x 1\nab r 10\n"), &mut out);
    match result {
        Err(RunError::Parse(ParseError::InvalidCommand('x'))) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    // The write produced no output and the dump never happened.
    assert!(out.is_empty());
}

#[test]
fn reads_the_request_log_from_a_file() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    log.write_all(b"ab w 10\nab r 10\n").unwrap();

    let mut out = Vec::new();
    run(BufReader::new(File::open(log.path()).unwrap()), &mut out).unwrap();

    assert_eq!(&out[..11], b"aaaaaaaaaa\n");
    assert_eq!(out.len(), 11 + DUMP_LEN);
}

#[test]
fn exhausting_the_data_region_reports_no_space_and_keeps_partial_content() {
    // 55 data blocks are free after the directory claims one. Four
    // 12-block files leave seven, so the fifth write is truncated.
    let script = "\
aa w 49152
bb w 49152
cc w 49152
dd w 49152
zz w 40960
zz r 40960
";
    let out = run_script(script);

    let mut want = Vec::new();
    want.extend_from_slice(b"No space\n");
    want.extend_from_slice(&vec![b'z'; 7 * BLOCK_SIZE]);
    want.extend_from_slice(b"\n");
    assert_eq!(&out[..want.len()], &want[..]);
    assert_eq!(out.len(), want.len() + DUMP_LEN);
}
