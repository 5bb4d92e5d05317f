//! Integration tests for staged-file discovery and hook installation

mod common;

use std::fs;

use common::{create_test_repo, git, stage_file, write_file};
use scopegate::git::{HOOK_MARKER, find_git_root, install_hook, staged_files};

#[test]
fn staged_files_lists_only_the_index() {
    let repo = create_test_repo();
    let root = repo.path();

    stage_file(root, "api/app.py", "print('hi')\n");
    stage_file(root, "web/utils/format.ts", "export {}\n");
    write_file(root, "web/unstaged.ts", "export {}\n");

    let change_set = staged_files(root).expect("staged files");
    let mut paths = change_set.paths().to_vec();
    paths.sort();
    assert_eq!(paths, ["api/app.py", "web/utils/format.ts"]);
}

#[test]
fn staged_files_includes_deletions() {
    let repo = create_test_repo();
    let root = repo.path();

    git(root, &["rm", "-q", "README"]);

    let change_set = staged_files(root).expect("staged files");
    assert_eq!(change_set.paths(), ["README"]);
}

#[test]
fn nothing_staged_is_empty() {
    let repo = create_test_repo();
    assert!(staged_files(repo.path()).expect("staged files").is_empty());
}

#[test]
fn staged_files_outside_repo_is_classification_error() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    if find_git_root(dir.path()).is_some() {
        // Temp dir lives inside a checkout on this machine
        return;
    }
    let err = staged_files(dir.path()).unwrap_err();
    assert!(!err.is_configuration());
}

#[test]
fn find_git_root_from_subdirectory() {
    let repo = create_test_repo();
    let sub = repo.path().join("web/app");
    fs::create_dir_all(&sub).unwrap();

    let root = find_git_root(&sub).expect("git root");
    assert_eq!(
        root.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

#[test]
fn install_hook_writes_executable_script() {
    let repo = create_test_repo();

    let hook = install_hook(repo.path(), "scopegate", false).expect("install hook");
    let content = fs::read_to_string(&hook).unwrap();
    assert!(content.contains(HOOK_MARKER));
    assert!(content.contains("exec 'scopegate' run"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&hook).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    // Reinstalling over our own hook is fine
    install_hook(repo.path(), "scopegate", false).expect("reinstall hook");
}

#[test]
fn install_hook_keeps_foreign_hook_unless_forced() {
    let repo = create_test_repo();
    let hooks = repo.path().join(".git/hooks");
    fs::create_dir_all(&hooks).unwrap();
    fs::write(hooks.join("pre-commit"), "#!/bin/sh\nexit 0\n").unwrap();

    let err = install_hook(repo.path(), "scopegate", false).unwrap_err();
    assert!(err.to_string().contains("--force"));

    install_hook(repo.path(), "scopegate", true).expect("forced install");
    let content = fs::read_to_string(hooks.join("pre-commit")).unwrap();
    assert!(content.contains(HOOK_MARKER));
}
