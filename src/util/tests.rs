use std::collections::HashSet;

use super::*;

#[test]
fn path_resolve() {
    let base = Path::new("/projects/book");

    let relative = PathBuf::from("output").resolved(base);
    assert_eq!(relative, Path::new("/projects/book/output"));

    let absolute = PathBuf::from("/tmp/library.json").resolved(base);
    assert_eq!(absolute, Path::new("/tmp/library.json"));
}

#[test]
fn lexical_sort() {
    let mut titles = vec!["Zion", "amazing grace", "Ámen", "Be Thou My Vision"];
    sort_lexical(&mut titles);
    assert_eq!(titles, ["amazing grace", "Ámen", "Be Thou My Vision", "Zion"]);
}

#[test]
fn uid_shape() {
    let id = uid();
    let groups: Vec<_> = id.split('-').map(str::len).collect();
    assert_eq!(groups, [8, 4, 4, 4, 12]);
    assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
    assert_eq!(&id[14..15], "4");
    assert!("89ab".contains(&id[19..20]));
}

#[test]
fn uid_unique() {
    let ids: HashSet<_> = (0..1000).map(|_| uid()).collect();
    assert_eq!(ids.len(), 1000);
}
