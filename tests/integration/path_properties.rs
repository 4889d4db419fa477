use hacktheplanet::tree::path::{normalize, segments};
use hacktheplanet::tree::{Filesystem, FsNode};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,8}"
}

fn cwd() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![segment(), Just("..".to_string()), Just(".".to_string())], 0..5)
        .prop_map(|segs| format!("/{}", segs.join("/")))
}

proptest! {
    #[test]
    fn absolute_paths_ignore_the_working_directory(
        dirs in prop::collection::vec(segment(), 1..5),
        leaf in segment(),
        cwd in cwd(),
    ) {
        let mut fs = Filesystem::with_base_structure(["ls"]);
        let dir = format!("/tmp/{}", dirs.join("/"));
        fs.add_file(&dir, &leaf, FsNode::text("payload")).unwrap();

        let target = format!("{}/{}", dir, leaf);
        let from_root = fs.resolve("/", &target).unwrap().clone();
        let from_cwd = fs.resolve(&cwd, &target).unwrap().clone();
        prop_assert_eq!(from_root, from_cwd);

        let dir_from_cwd = fs.resolve(&cwd, &dir).unwrap();
        prop_assert!(dir_from_cwd.is_dir());
    }

    #[test]
    fn normalized_paths_are_stable(cwd in cwd(), rel in cwd()) {
        let once = normalize(&cwd, rel.trim_start_matches('/'));
        prop_assert!(once.starts_with('/'));
        prop_assert!(!once.contains("//"));
        prop_assert_eq!(normalize("/", &once), once.clone());
        prop_assert!(segments("/", &once).iter().all(|s| s != "." && s != ".."));
    }

    #[test]
    fn parent_steps_clamp_at_root(depth in 0usize..6, extra in 1usize..6) {
        let down = vec!["d"; depth].join("/");
        let up = vec![".."; depth + extra].join("/");
        prop_assert_eq!(normalize(&format!("/{}", down), &up), "/");
    }
}
