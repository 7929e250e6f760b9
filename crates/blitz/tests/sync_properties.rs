//! End-to-end properties of the sync engine against a real directory and
//! an on-disk database.

use std::collections::HashSet;
use std::fs;

use blitz::db::{Database, IssueRepository, ProjectRepository};
use blitz::domain::{IssueId, NewIssue, NewProject};
use blitz::identity;
use blitz::report::{SyncAction, SyncReport};
use blitz::sync::process_issues;
use blitz_markdown::{IssueDirectory, IssueDocument, IssueFileStore};
use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{first_line, write_issue};

const PROJECT: &str = "blitzkrieg";

struct Workspace {
    _dir: TempDir,
    files: IssueDirectory,
    db: Database,
}

impl Workspace {
    fn sync(&mut self) -> SyncReport {
        let mut report = SyncReport::new();
        process_issues(&mut self.db, &self.files, PROJECT, &mut report)
            .expect("sync should not abort");
        report
    }

    fn issues_dir(&self) -> &std::path::Path {
        self.files.root()
    }

    fn seed_issue(&mut self, title: &str, description: &str) -> IssueId {
        let session = self.db.session().unwrap();
        let project = session.get_project_by_name(PROJECT).unwrap().unwrap();
        let id = identity::generate();
        session
            .create(
                NewIssue {
                    id,
                    title: title.to_string(),
                    description: description.to_string(),
                    index: session.next_index().unwrap(),
                    branch_name: "seeded".to_string(),
                },
                &project.id,
            )
            .unwrap();
        session.commit().unwrap();
        id
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("should create temp dir");
    let issues = dir.path().join("issues");
    fs::create_dir(&issues).unwrap();

    let mut db = Database::open(&dir.path().join(".blitz").join("blitz.db")).unwrap();
    let session = db.session().unwrap();
    session.create_project(NewProject::named(PROJECT)).unwrap();
    session.commit().unwrap();

    Workspace {
        files: IssueDirectory::new(issues),
        _dir: dir,
        db,
    }
}

fn actions(report: &SyncReport) -> Vec<SyncAction> {
    report.rows().iter().map(|r| r.action).collect()
}

#[rstest]
fn second_run_is_idempotent(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    write_issue(&dir, "one.md", "# First\n\nAlpha\n");
    write_issue(&dir, "two.md", "Second\n\nBeta\n");
    workspace.seed_issue("Third: from db", "Gamma");
    workspace.sync();

    let second = workspace.sync();

    assert_eq!(
        actions(&second),
        vec![SyncAction::Unchanged; 3],
        "rows: {:?}",
        second.rows()
    );
}

#[rstest]
fn assigned_ids_never_change(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    let path = write_issue(&dir, "one.md", "Title\n\nBody\n");

    workspace.sync();
    let id = first_line(&path);
    fs::write(&path, format!("{id}\nNew title\n\nNew body\n")).unwrap();
    workspace.sync();
    workspace.sync();

    assert_eq!(first_line(&path), id);
}

#[rstest]
fn indexes_strictly_increase(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    for i in 0..5 {
        write_issue(&dir, &format!("issue{i}.md"), &format!("Issue {i}\n\nBody\n"));
    }

    workspace.sync();
    write_issue(&dir, "late.md", "Late\n\nBody\n");
    workspace.sync();

    let session = workspace.db.session().unwrap();
    let indexes: Vec<i64> = session.get_all().unwrap().iter().map(|i| i.index).collect();
    assert_eq!(indexes, vec![1, 2, 3, 4, 5, 6]);
}

#[rstest]
fn every_issue_has_exactly_one_file(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    write_issue(&dir, "disk.md", "On disk\n\nBody\n");
    workspace.seed_issue("Only in db", "Body");
    workspace.seed_issue("# Also: only-in db", "Body");

    workspace.sync();

    let ids_on_disk: Vec<String> = workspace
        .files
        .list_markdown_files()
        .unwrap()
        .iter()
        .map(|p| first_line(p))
        .collect();
    let unique: HashSet<&String> = ids_on_disk.iter().collect();
    assert_eq!(unique.len(), ids_on_disk.len());

    let session = workspace.db.session().unwrap();
    for issue in session.get_all().unwrap() {
        assert!(ids_on_disk.contains(&issue.id.to_string()));
    }
    assert!(dir.join("only_in_db.md").is_file());
    assert!(dir.join("also_onlyin_db.md").is_file());
}

#[rstest]
fn materialized_file_uses_canonical_layout(mut workspace: Workspace) {
    let id = workspace.seed_issue("Fix login bug", "Users cannot log in.");

    let report = workspace.sync();

    assert_eq!(actions(&report), vec![SyncAction::Synced]);
    assert_eq!(report.rows()[0].name, "fix_login_bug.md");
    let path = workspace.issues_dir().join("fix_login_bug.md");
    let document = workspace.files.read_document(&path).unwrap();
    assert_eq!(
        document,
        IssueDocument::new(id.to_string(), "Fix login bug", "Users cannot log in.")
    );
}

#[rstest]
fn title_edit_keeps_branch_name(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    let path = write_issue(&dir, "a.md", "Original title\n\nBody\n");
    workspace.sync();
    let id = first_line(&path);
    fs::write(&path, format!("{id}\n# Renamed\n\nBody\n")).unwrap();

    let report = workspace.sync();

    assert_eq!(actions(&report), vec![SyncAction::Updated]);
    let session = workspace.db.session().unwrap();
    let issue = session.get_by_id(&id.parse().unwrap()).unwrap().unwrap();
    assert_eq!(issue.title, "Renamed");
    assert_eq!(issue.branch_name, "bltz-original-title");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{id}\n# Renamed\n\nBody\n")
    );
}

#[rstest]
fn failed_file_does_not_block_others(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    write_issue(&dir, "a_bad.md", "only one line");
    write_issue(&dir, "b_good.md", "Good\n\nBody\n");
    fs::write(dir.join("c_binary.md"), [0xff, 0xfe, 0x00]).unwrap();

    let report = workspace.sync();

    assert_eq!(
        actions(&report),
        vec![
            SyncAction::Error,
            SyncAction::IdAssigned,
            SyncAction::Created,
            SyncAction::Error
        ]
    );
    assert_eq!(report.count(SyncAction::Error), 2);
}

#[rstest]
fn duplicate_id_in_two_files_is_reported_once(mut workspace: Workspace) {
    let dir = workspace.issues_dir().to_path_buf();
    let path = write_issue(&dir, "a.md", "Title\n\nBody\n");
    workspace.sync();
    let id = first_line(&path);
    write_issue(&dir, "b.md", &format!("{id}\nCopy\n\nOther body\n"));

    let report = workspace.sync();

    // a.md still matches the row, then b.md overwrites it
    assert_eq!(
        actions(&report),
        vec![SyncAction::Unchanged, SyncAction::Updated]
    );
}
