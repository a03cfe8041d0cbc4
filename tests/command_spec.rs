//! `pvctl apply` output and error reporting.

mod common;

use pvctl::command::apply;
use pvctl::manifest::KindRegistry;
use pvctl::{ProvisionError, Provisioner};

use common::{asset_manifest, closed_backend_url, write_manifest, MockBackend};

fn setup() -> Provisioner {
    Provisioner::new(KindRegistry::default()).expect("Failed to create provisioner")
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("Output is not UTF-8")
}

mod apply_command {
    use super::*;

    #[tokio::test]
    async fn reports_no_objects_and_sends_nothing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend = MockBackend::start().await;
        let mut out = Vec::new();

        let sent = apply(&setup(), &backend.url, &[dir.path().to_path_buf()], &mut out)
            .await
            .expect("Apply failed");

        assert_eq!(sent, 0);
        assert_eq!(output(out), "No objects found for apply.\n");
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn reports_the_count_then_sends() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let first = write_manifest(dir.path(), "a1.yaml", &asset_manifest("a1"));
        let second = write_manifest(dir.path(), "a2.yaml", &asset_manifest("a2"));
        let backend = MockBackend::start().await;
        let mut out = Vec::new();

        let sent = apply(&setup(), &backend.url, &[first, second], &mut out)
            .await
            .expect("Apply failed");

        assert_eq!(sent, 2);
        assert_eq!(
            output(out),
            "apply found 2 object(s) loaded and ready to send.\n"
        );
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn load_error_stops_before_printing_a_count() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let good = write_manifest(dir.path(), "a1.yaml", &asset_manifest("a1"));
        let missing = dir.path().join("missing.yaml");
        let backend = MockBackend::start().await;
        let mut out = Vec::new();

        let err = apply(&setup(), &backend.url, &[good, missing.clone()], &mut out)
            .await
            .expect_err("Expected apply to fail");

        match err.downcast_ref::<ProvisionError>() {
            Some(ProvisionError::PathNotFound { path, .. }) => assert_eq!(path, &missing),
            other => panic!("Expected PathNotFound, got {:?}", other),
        }
        assert!(out.is_empty());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn submission_error_is_returned() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        write_manifest(dir.path(), "a1.yaml", &asset_manifest("a1"));
        let mut out = Vec::new();

        let err = apply(
            &setup(),
            &closed_backend_url().await,
            &[dir.path().to_path_buf()],
            &mut out,
        )
        .await
        .expect_err("Expected apply to fail");

        assert!(matches!(
            err.downcast_ref::<ProvisionError>(),
            Some(ProvisionError::SubmissionFailed { .. })
        ));
        assert_eq!(
            output(out),
            "apply found 1 object(s) loaded and ready to send.\n"
        );
    }
}
