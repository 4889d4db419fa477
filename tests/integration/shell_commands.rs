use hacktheplanet::tree::FsNode;

use crate::support::Game;

#[test]
fn unknown_command_is_reported() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("hackit"), "Command not found: hackit");
    assert_eq!(game.run("   "), "");
}

#[test]
fn pwd_requires_a_logged_in_user() {
    let mut game = Game::fresh();
    assert_eq!(game.run("pwd"), "pwd: nobody is logged in");

    let mut game = Game::logged_in();
    assert_eq!(game.run("pwd"), "/home/neo");
}

#[test]
fn mkdir_cd_and_back_restores_path() {
    let mut game = Game::logged_in();
    game.run("mkdir projects");
    let before = game.cwd();
    assert_eq!(game.run("cd projects"), "");
    assert_eq!(game.cwd(), "/home/neo/projects");
    game.run("cd ..");
    assert_eq!(game.cwd(), before);
}

#[test]
fn mkdir_reports_existing_and_creates_the_rest() {
    let mut game = Game::logged_in();
    let out = game.run("mkdir Documents tools");
    assert_eq!(out, "mkdir: cannot create directory 'Documents': File exists");
    assert!(game.player().filesystem().get_node("/home/neo/tools").unwrap().is_dir());
}

#[test]
fn mkdir_directly_under_home_is_refused() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("mkdir /home/smith"), "mkdir: /home/smith: Permission denied");
    assert_eq!(game.run("touch /home/smith"), "touch: /home/smith: Permission denied");
    assert!(game.player().filesystem().get_node("/home/smith").is_none());
}

#[test]
fn mkdir_and_touch_reject_flags() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("mkdir -p deep"), "usage: mkdir <dir>...");
    assert_eq!(game.run("touch -a note"), "usage: touch <file>...");
    let home = game.player().filesystem().get_node("/home/neo").unwrap().as_dir().unwrap();
    assert!(!home.contains_key("-p"));
    assert!(!home.contains_key("deep"));
    assert!(!home.contains_key("note"));
}

#[test]
fn cd_handles_home_shortcuts_and_root_clamp() {
    let mut game = Game::logged_in();
    game.run("cd /");
    game.run("cd ../../..");
    assert_eq!(game.cwd(), "/");
    game.run("cd ~/Downloads");
    assert_eq!(game.cwd(), "/home/neo/Downloads");
    game.run("cd");
    assert_eq!(game.cwd(), "/home/neo");
    game.run("cd /etc");
    game.run("cd ~");
    assert_eq!(game.cwd(), "/home/neo");
}

#[test]
fn cd_home_without_a_user_goes_to_home_root() {
    let mut game = Game::fresh();
    game.run("cd /etc");
    assert_eq!(game.cwd(), "/etc");
    game.run("cd ~");
    assert_eq!(game.cwd(), "/home");
}

#[test]
fn cd_refuses_missing_files_and_archives() {
    let mut game = Game::logged_in();
    game.run("touch notes.txt");
    game.run("mkdir loot.zip");

    assert_eq!(game.run("cd nowhere"), "cd: nowhere: No such file or directory");
    assert_eq!(game.run("cd notes.txt"), "cd: notes.txt is a file, not a directory");
    assert_eq!(game.run("cd loot.zip"), "cd: loot.zip: is a zip archive, use unzip first");
    assert_eq!(game.run("cd notes.txt/inner"), "cd: notes.txt is a file, not a directory");
    assert_eq!(game.cwd(), "/home/neo");
}

#[test]
fn ls_lists_visible_entries_in_order() {
    let mut game = Game::logged_in();
    game.run("touch .bashrc");
    assert_eq!(
        game.run("ls"),
        "Desktop  Documents  Downloads  Movies  Music  Pictures"
    );
    assert!(game.run("ls -a").starts_with(".bashrc  Desktop"));
    assert!(!game.run("ls /").contains(".game_states"));
    assert_eq!(game.run("ls /tmp"), "");
}

#[test]
fn ls_explains_non_directories() {
    let mut game = Game::logged_in();
    game.run("touch a.txt");
    assert_eq!(game.run("ls a.txt"), "ls: a.txt: is a file, not a directory");
    assert_eq!(game.run("ls -x"), "usage: ls [-a] [path]");
    assert_eq!(game.run("ls ghost"), "ls: ghost: No such file or directory");
}

#[test]
fn touch_then_cat_reports_unreadable() {
    let mut game = Game::logged_in();
    game.run("touch empty.txt");
    assert_eq!(game.run("cat empty.txt"), "cat: empty.txt: not a readable file");
    assert_eq!(game.run("touch empty.txt"), "touch: empty.txt: file already exists");
    assert_eq!(game.run("touch Documents"), "touch: Documents: is a directory");
    assert_eq!(
        game.run("touch missing/file.txt"),
        "touch: missing: No such file or directory"
    );

    game.run("touch notes.txt");
    assert_eq!(
        game.run("touch notes.txt/x"),
        "touch: notes.txt is a file, not a directory"
    );
}

#[test]
fn echo_overwrites_and_appends() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("echo \"hello\" > note.txt"), "");
    assert_eq!(game.run("cat note.txt"), "hello");
    game.run("echo \" world\" >> note.txt");
    assert_eq!(game.run("cat note.txt"), "hello\n world");
    game.run("echo reset > note.txt");
    assert_eq!(game.run("cat note.txt"), "reset");
}

#[test]
fn echo_redirect_target_may_be_quoted() {
    let mut game = Game::logged_in();
    game.run("echo hi > \"my.txt\"");
    assert_eq!(game.run("cat my.txt"), "hi");
    assert!(game.player().filesystem().get_node("/home/neo/\"my.txt\"").is_none());
    assert_eq!(game.run("echo hi > ''"), "usage: echo <text> [> file | >> file]");
}

#[test]
fn echo_without_redirect_prints() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("echo \"a > b\""), "a > b");
    assert_eq!(game.run("echo plain words"), "plain words");
    assert_eq!(game.run("echo hi >"), "usage: echo <text> [> file | >> file]");
    assert_eq!(game.run("echo hi > Documents"), "echo: Documents: is a directory");
}

#[test]
fn echo_appends_to_empty_file_without_blank_line() {
    let mut game = Game::logged_in();
    game.run("touch log.txt");
    game.run("echo first >> log.txt");
    assert_eq!(game.run("cat log.txt"), "first");
}

#[test]
fn cat_refuses_directories_archives_and_media() {
    let mut game = Game::logged_in();
    game.network
        .host_mut(0)
        .add_file_to_filesystem(
            "/home/neo/Movies",
            "hackers.mov",
            FsNode::Frames(vec!["frame1".into(), "frame2".into()]),
        )
        .unwrap();
    game.run("mkdir stash.zip");

    assert_eq!(game.run("cat Documents"), "cat: Documents: is a directory");
    assert_eq!(
        game.run("cat stash.zip"),
        "cat: stash.zip: is a zip archive, use unzip to extract it"
    );
    assert_eq!(
        game.run("cat Movies/hackers.mov"),
        "cat: Movies/hackers.mov: is a media file, use open to play it"
    );
    assert_eq!(game.run("cat"), "usage: cat <file>");
}

#[test]
fn open_plays_media_at_configured_rate() {
    let mut game = Game::logged_in();
    game.network
        .host_mut(0)
        .add_file_to_filesystem(
            "/home/neo/Movies",
            "hackers.mov",
            FsNode::Frames(vec!["frame1".into(), "frame2".into()]),
        )
        .unwrap();
    game.run("echo readme > readme.txt");

    assert_eq!(game.run("open Movies/hackers.mov"), "");
    let (frames, fps) = &game.console.animations()[0];
    assert_eq!(frames.len(), 2);
    assert_eq!(*fps, 24);

    assert_eq!(game.run("open readme.txt"), "readme");
    assert_eq!(game.run("open Movies"), "open: Movies: is a directory");
}

#[test]
fn rm_rf_removes_subtree() {
    let mut game = Game::logged_in();
    game.run("mkdir work");
    game.run("mkdir work/deep");
    game.run("echo x > work/deep/file.txt");

    assert_eq!(
        game.run("rm work"),
        "rm: work: directory not empty, use 'rm -rf' to remove it"
    );
    assert_eq!(game.run("rm -rf work"), "");
    assert!(!game.run("ls").contains("work"));
    assert!(game.player().filesystem().get_node("/home/neo/work").is_none());
}

#[test]
fn rm_handles_files_archives_and_empty_dirs() {
    let mut game = Game::logged_in();
    game.run("touch a.txt");
    game.run("mkdir empty");
    game.run("mkdir full.zip");
    game.run("touch full.zip/inside");

    assert_eq!(game.run("rm a.txt"), "");
    assert_eq!(game.run("rm empty"), "rm: empty: is a directory, use 'rmdir' or 'rm -r'");
    assert_eq!(game.run("rm full.zip"), "");
    assert_eq!(game.run("rm a.txt"), "rm: a.txt: No such file or directory");
    assert_eq!(game.run("rm"), "usage: rm [-r] <path>...");
}

#[test]
fn rm_refuses_protected_paths() {
    let mut game = Game::logged_in();
    for target in ["/", "/home", "/home/neo", "/etc", "/etc/.passwd"] {
        assert_eq!(
            game.run(&format!("rm -rf {}", target)),
            format!("rm: {}: Permission denied", target)
        );
    }
    assert_eq!(game.run("rmdir -r ~"), "rmdir: ~: Permission denied");
    assert_eq!(game.player().filesystem().password(), "pass1");
}

#[test]
fn rmdir_distinguishes_files_and_contents() {
    let mut game = Game::logged_in();
    game.run("mkdir a");
    game.run("mkdir b");
    game.run("touch b/c");
    game.run("touch f");

    assert_eq!(game.run("rmdir a"), "");
    assert_eq!(
        game.run("rmdir b"),
        "rmdir: b: directory not empty, use 'rmdir -rf' to remove it"
    );
    assert_eq!(game.run("rmdir f"), "rmdir: f: not a directory, use rm instead");
    assert_eq!(game.run("rmdir -rf b"), "");
    assert_eq!(game.run("ls"), "Desktop  Documents  Downloads  Movies  Music  Pictures  f");
}

#[test]
fn removing_the_working_directory_moves_up() {
    let mut game = Game::logged_in();
    game.run("mkdir tmpwork");
    game.run("mkdir tmpwork/inner");
    game.run("cd tmpwork/inner");
    game.run("rm -r /home/neo/tmpwork");
    assert_eq!(game.cwd(), "/home/neo");
}

#[test]
fn find_reports_matches_then_none_after_rm() {
    let mut game = Game::logged_in();
    game.run("echo classified > Downloads/secret.txt");
    assert_eq!(game.run("find secret /"), "/home/neo/Downloads/secret.txt");
    assert!(game.player().find("secret", "/"));

    game.run("rm Downloads/secret.txt");
    assert_eq!(game.run("find secret /"), "find: no matches for 'secret'");
    assert!(!game.player().find("secret", "/"));
}

#[test]
fn find_defaults_to_working_directory_and_hides_dot_names() {
    let mut game = Game::logged_in();
    game.run("mkdir .hidden");
    game.run("touch .hidden/target_one");
    game.run("touch Documents/target_two");

    assert_eq!(game.run("find target"), "/home/neo/Documents/target_two");
    assert_eq!(
        game.run("find -a target"),
        "/home/neo/.hidden/target_one\n/home/neo/Documents/target_two"
    );
    assert_eq!(game.run("find Doc"), "/home/neo/Documents/");
    assert_eq!(game.run("find"), "usage: find [-a] <term> [path]");
}

#[test]
fn unzip_extracts_next_to_archive_with_suffix() {
    let mut game = Game::logged_in();
    game.run("mkdir plans.zip");
    game.run("echo blueprint > plans.zip/gibson.txt");
    game.run("mkdir plans");

    assert_eq!(
        game.run("unzip plans.zip"),
        "Extracted plans.zip to /home/neo/plans_1"
    );
    assert_eq!(game.run("cat plans_1/gibson.txt"), "blueprint");
    assert_eq!(game.run("unzip plans"), "unzip: plans: not a zip archive");
    assert_eq!(game.run("unzip ghost.zip"), "unzip: ghost.zip: No such file or directory");
}

#[test]
fn unzip_of_a_leaf_archive_gives_an_empty_directory() {
    let mut game = Game::logged_in();
    game.network
        .host_mut(0)
        .add_file_to_filesystem("/home/neo", "blob.zip", FsNode::text("bytes"))
        .unwrap();
    assert_eq!(game.run("unzip blob.zip"), "Extracted blob.zip to /home/neo/blob");
    assert_eq!(
        game.player().filesystem().get_node("/home/neo/blob"),
        Some(&FsNode::empty_dir())
    );
}

#[test]
fn setpasswd_changes_host_password() {
    let mut game = Game::logged_in();
    assert_eq!(game.run("setpasswd hunter2"), "Password updated.");
    assert_eq!(game.player().filesystem().password(), "hunter2");
    assert_eq!(game.player().active_user().unwrap().password, "hunter2");

    let mut game = Game::fresh();
    assert_eq!(game.run("setpasswd x"), "setpasswd: nobody is logged in");
}

#[test]
fn help_lists_every_command() {
    let mut game = Game::logged_in();
    let out = game.run("help");
    for name in game.shell.command_names() {
        assert!(out.contains(name), "help is missing {}", name);
    }
    assert!(out.contains("Usage"));
}

#[test]
fn ifconfig_shows_host_address() {
    let mut game = Game::logged_in();
    let out = game.run("ifconfig");
    assert!(out.starts_with("localhost:"));
    assert!(out.contains("inet 127.0.0.1"));
}

#[test]
fn clear_goes_through_console() {
    let mut game = Game::logged_in();
    game.run("clear");
    assert_eq!(game.console.clears(), 1);
}

#[test]
fn bin_lists_builtin_commands() {
    let game = Game::fresh();
    let bin = game.player().filesystem().get_node("/bin").unwrap();
    let names: Vec<_> = bin.as_dir().unwrap().keys().cloned().collect();
    assert_eq!(names.len(), game.shell.command_names().len());
    assert!(names.contains(&"ssh".to_string()));
}
