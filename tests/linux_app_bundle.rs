//! End-to-end Linux app image test: a minimal application with one jar, no
//! embedded runtime, bundled to an output directory.

#![cfg(target_os = "linux")]

use std::io::Write;
use std::path::Path;

use jbundle::bundler::{
    Applicability, BundleParams, BundleType, BundlerKind, PackagingRun, RelativeFileSet, builder,
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

fn demo_params(resource_dir: &Path) -> BundleParams {
    let jar = resource_dir.join("demo.jar");
    write_demo_jar(&jar);
    let mut params = BundleParams::default();
    params.name = Some("Demo".to_string());
    params.application_class = Some("com.example.Main".to_string());
    params.app_resources = Some(RelativeFileSet::new(resource_dir, vec![jar]).expect("fileset"));
    params
}

#[tokio::test]
async fn app_image_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    let tmp = tempfile::tempdir().expect("tempdir");
    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");
    let params = demo_params(&resources);

    let run = PackagingRun::new(None, false).expect("run");
    let out = tmp.path().join("out");

    let outcome = builder::bundle_all(&params, &out, Some(&["linux.app"]), BundleType::Image, &run)
        .await
        .expect("bundle_all");

    assert!(outcome.failures.is_empty(), "failures: {:?}", outcome.failures);
    assert_eq!(outcome.artifacts.len(), 1);
    let artifact = &outcome.artifacts[0];
    assert_eq!(artifact.kind, BundlerKind::LinuxApp);
    assert_eq!(artifact.checksum.len(), 64);
    assert!(artifact.size > 0);

    let image = out.join("Demo");
    assert_eq!(artifact.path, image);
    assert!(image.join("Demo").is_file(), "launcher missing");
    assert!(image.join("app/demo.jar").is_file(), "payload missing");
    assert!(!image.join("runtime").exists(), "no runtime was requested");

    let cfg = std::fs::read_to_string(image.join("app/package.cfg")).expect("package.cfg");
    assert!(cfg.contains("app.mainjar=demo.jar\n"));
    assert!(cfg.contains("app.mainclass=com/example/Main\n"));
    assert!(cfg.contains("app.classpath=\n"));
    assert!(!cfg.contains("app.id="), "app.id is windows-only");
}

#[tokio::test]
async fn installer_selection_excludes_image_bundlers() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");
    let params = demo_params(&resources);

    let run = PackagingRun::new(None, false).expect("run");
    let selected = builder::candidates(&params, None, BundleType::Installer, &run).await;
    assert!(!selected.contains(&BundlerKind::LinuxApp));
    // deb only appears when dpkg-deb is installed; either way no image kinds
    for kind in &selected {
        assert_eq!(kind.bundle_type(), BundleType::Installer);
    }
}

#[tokio::test]
async fn misconfigured_params_produce_no_candidates() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");

    // jar present but the configured class matches nothing
    let mut params = demo_params(&resources);
    params.application_class = Some("com.example.DoesNotExist".to_string());

    let run = PackagingRun::new(None, false).expect("run");
    match builder::validate(BundlerKind::LinuxApp, &params, &run).await {
        Applicability::Misconfigured { message, .. } => {
            assert!(message.contains("com.example.DoesNotExist"));
        }
        other => panic!("unexpected verdict {other:?}"),
    }
    let selected = builder::candidates(&params, None, BundleType::All, &run).await;
    assert!(selected.is_empty());
}

#[tokio::test]
async fn verbose_run_dumps_params_and_keeps_scratch() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let resources = tmp.path().join("resources");
    std::fs::create_dir_all(&resources).expect("mkdir");
    let params = demo_params(&resources);

    let run = PackagingRun::new(None, true).expect("run");
    let out = tmp.path().join("out");
    builder::bundle_all(&params, &out, Some(&["linux.app"]), BundleType::All, &run)
        .await
        .expect("bundle_all");

    assert!(run.config_root().join("bundle-params.json").is_file());
    assert!(run.config_root().join("package.cfg").is_file());
}
