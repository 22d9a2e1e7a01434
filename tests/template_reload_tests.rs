use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use agro_consultoria::{TemplateError, TemplateRegistry};
use serde_json::json;

fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut root = std::env::temp_dir();
    root.push(format!(
        "agro-templates-{label}-{}-{}",
        std::process::id(),
        nanos
    ));
    fs::create_dir_all(root.join("partials")).expect("failed to create template dir");
    root
}

fn write(root: &Path, name: &str, body: &str) {
    fs::write(root.join(name), body).expect("failed to write template");
}

#[test]
fn reload_picks_up_edits_and_new_files() {
    let root = temp_root("edit");
    write(&root, "hello.html", "Olá, {{ name }}!");
    let registry = TemplateRegistry::load(&root).expect("initial load");
    assert_eq!(
        registry.render("hello.html", &json!({"name": "Ana"})).expect("render"),
        "Olá, Ana!"
    );

    write(&root, "hello.html", "Bom dia, {{ name }}.");
    write(&root, "partials/extra.html", "{{ format_area(3.5) }}");
    let count = registry.reload().expect("reload");
    assert_eq!(count, 2);
    assert_eq!(
        registry.render("hello.html", &json!({"name": "Ana"})).expect("render"),
        "Bom dia, Ana."
    );
    assert_eq!(
        registry.render("partials/extra.html", &json!({})).expect("render"),
        "3,50 ha"
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn failed_reload_keeps_the_previous_set() {
    let root = temp_root("broken");
    write(&root, "page.html", "v1 {{ value }}");
    let registry = TemplateRegistry::load(&root).expect("initial load");

    write(&root, "page.html", "v2 {% if value %}unterminated");
    let err = registry.reload().expect_err("broken template must fail the reload");
    assert!(matches!(err, TemplateError::Parse { .. }));

    assert_eq!(
        registry.render("page.html", &json!({"value": 1})).expect("render"),
        "v1 1"
    );

    fs::remove_dir_all(&root).expect("failed to remove template dir");
    assert!(matches!(registry.reload(), Err(TemplateError::MissingRoot(_))));
    assert_eq!(
        registry.render("page.html", &json!({"value": 2})).expect("render"),
        "v1 2"
    );
}

#[test]
fn renders_during_reload_see_a_whole_set() {
    let root = temp_root("concurrent");
    write(&root, "a.html", "one");
    write(&root, "b.html", "one");
    let registry = Arc::new(TemplateRegistry::load(&root).expect("initial load"));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let env = registry.snapshot();
                    let a = env
                        .get_template("a.html")
                        .and_then(|t| t.render(json!({})))
                        .expect("render a");
                    let b = env
                        .get_template("b.html")
                        .and_then(|t| t.render(json!({})))
                        .expect("render b");
                    assert_eq!(a, b, "mixed template generations");
                }
            })
        })
        .collect();

    for generation in ["two", "three", "four"] {
        write(&root, "a.html", generation);
        write(&root, "b.html", generation);
        registry.reload().expect("reload");
    }

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    assert_eq!(registry.render("a.html", &json!({})).expect("render"), "four");

    let _ = fs::remove_dir_all(&root);
}
