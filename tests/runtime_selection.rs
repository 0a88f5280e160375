//! Runtime validation, subsetting and bundling with an embedded runtime,
//! plus drop-in resource overrides.

#![cfg(target_os = "linux")]

use std::io::Write;
use std::path::Path;

use jbundle::bundler::{
    BundleParams, PackagingRun, RelativeFileSet,
    platform::linux::app,
    settings::runtime,
};

fn write_demo_jar(path: &Path) {
    let file = std::fs::File::create(path).expect("create jar");
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file(
            "META-INF/MANIFEST.MF",
            zip::write::SimpleFileOptions::default(),
        )
        .expect("start manifest");
    writer
        .write_all(b"Manifest-Version: 1.0\r\nMain-Class: com.example.Main\r\n")
        .expect("write manifest");
    writer.finish().expect("finish jar");
}

fn fake_jdk(root: &Path) {
    std::fs::create_dir_all(root.join("bin")).expect("mkdir");
    std::fs::create_dir_all(root.join("lib/ext")).expect("mkdir");
    std::fs::create_dir_all(root.join("lib/deploy")).expect("mkdir");
    std::fs::create_dir_all(root.join("man/man1")).expect("mkdir");
    std::fs::write(root.join("bin/java"), b"elf").expect("write");
    std::fs::write(root.join("lib/rt.jar"), b"jar").expect("write");
    std::fs::write(root.join("lib/ext/jfxrt.jar"), b"jar").expect("write");
    std::fs::write(root.join("lib/ext/sunec.jar"), b"jar").expect("write");
    std::fs::write(root.join("lib/deploy/deploy.dat"), b"x").expect("write");
    std::fs::write(root.join("man/man1/java.1"), b"man").expect("write");
}

#[tokio::test]
async fn bundling_with_a_subsetted_runtime() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let jdk = tmp.path().join("jdk");
    fake_jdk(&jdk);

    let home = runtime::validate_runtime_location(Some(&jdk))
        .expect("validate")
        .expect("some");
    let selected = runtime::select_runtime(&home).expect("select");
    assert!(selected.contains("lib/rt.jar"));
    assert!(selected.contains("lib/ext/jfxrt.jar"));
    assert!(!selected.files().any(|f| f.contains("sunec")));
    assert!(!selected.files().any(|f| f.contains("deploy")));
    assert!(!selected.files().any(|f| f.contains("man/")));

    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");
    let jar = resources.join("demo.jar");
    write_demo_jar(&jar);

    let mut params = BundleParams::default();
    params.name = Some("Demo".to_string());
    params.application_class = Some("com.example.Main".to_string());
    params.app_resources = Some(RelativeFileSet::new(&resources, vec![jar]).expect("fileset"));
    params.runtime = Some(selected);

    let run = PackagingRun::new(None, false).expect("run");
    let out = tmp.path().join("out");
    let image = app::bundle_project(&params, &out, &run).await.expect("bundle");

    assert!(image.join("runtime/lib/rt.jar").is_file());
    assert!(image.join("runtime/lib/ext/jfxrt.jar").is_file());
    assert!(!image.join("runtime/lib/ext/sunec.jar").exists());
    assert!(!image.join("runtime/lib/deploy").exists());
}

#[tokio::test]
async fn drop_in_launcher_override_wins() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");
    let jar = resources.join("demo.jar");
    write_demo_jar(&jar);

    let drop_in = tmp.path().join("overrides");
    std::fs::create_dir_all(&drop_in).expect("mkdir");
    std::fs::write(drop_in.join("linux-launcher.sh"), b"#!/bin/sh\necho custom\n")
        .expect("write");

    let mut params = BundleParams::default();
    params.name = Some("Demo".to_string());
    params.application_class = Some("com.example.Main".to_string());
    params.app_resources = Some(RelativeFileSet::new(&resources, vec![jar]).expect("fileset"));

    let run = PackagingRun::new(Some(drop_in), false).expect("run");
    let out = tmp.path().join("out");
    let image = app::bundle_project(&params, &out, &run).await.expect("bundle");

    let launcher = std::fs::read_to_string(image.join("Demo")).expect("launcher");
    assert_eq!(launcher, "#!/bin/sh\necho custom\n");
}
