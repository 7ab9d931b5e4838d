use super::*;

const DOCKER_MANIFEST: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
    "config": {
        "mediaType": "application/vnd.docker.container.image.v1+json",
        "size": 1469,
        "digest": "sha256:feb5d9fea6a5e9606aa995e879d862b825965ba48de054caab5ef356dc6b3412"
    },
    "layers": [
        {
            "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
            "size": 2479,
            "digest": "sha256:2db29710123e3e53a794f2694094b9b4338aa9ee5c40b930cb8063a1be392c54"
        }
    ]
}"#;

const OCI_INDEX: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.oci.image.index.v1+json",
    "manifests": [
        {
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "size": 1234,
            "digest": "sha256:c5b1261d6d3e43071626931fc004f70149baeba2c8ec672bd4f27761f8e1ad6b",
            "platform": { "architecture": "amd64", "os": "linux" }
        },
        {
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "size": 1234,
            "digest": "sha256:2db29710123e3e53a794f2694094b9b4338aa9ee5c40b930cb8063a1be392c54",
            "platform": { "architecture": "arm64", "os": "linux", "variant": "v8" }
        }
    ]
}"#;

#[test]
fn test_media_type_parse_all_known() {
    for media_type in [
        MediaType::DockerManifestV2,
        MediaType::DockerManifestListV2,
        MediaType::OciManifestV1,
        MediaType::OciIndexV1,
    ] {
        assert_eq!(MediaType::parse(media_type.as_str()), Some(media_type));
    }
}

#[test]
fn test_media_type_parse_ignores_parameters() {
    assert_eq!(
        MediaType::parse("application/vnd.oci.image.manifest.v1+json; charset=utf-8"),
        Some(MediaType::OciManifestV1)
    );
}

#[test]
fn test_decode_docker_manifest() {
    let document = ManifestDocument::from_bytes(DOCKER_MANIFEST.as_bytes(), None).unwrap();
    match document {
        ManifestDocument::DockerManifest(manifest) => {
            assert_eq!(manifest.schema_version, 2);
            assert_eq!(manifest.layers.len(), 1);
            assert_eq!(manifest.total_size().unwrap(), 1469 + 2479);
        }
        other => panic!("Expected DockerManifest, got {:?}", other),
    }
}

#[test]
fn test_decode_oci_index() {
    let document = ManifestDocument::from_bytes(OCI_INDEX.as_bytes(), None).unwrap();
    assert_eq!(document.media_type(), MediaType::OciIndexV1);

    let ManifestDocument::OciIndex(index) = document else {
        panic!("Expected OciIndex");
    };
    let (digest, entry) = index.first_entry().unwrap();
    assert_eq!(
        digest,
        "sha256:c5b1261d6d3e43071626931fc004f70149baeba2c8ec672bd4f27761f8e1ad6b"
    );
    assert_eq!(entry.platform.as_ref().unwrap().to_string(), "linux/amd64");
    assert_eq!(
        index.manifests[1].platform.as_ref().unwrap().to_string(),
        "linux/arm64/v8"
    );
}

#[test]
fn test_decode_falls_back_to_content_type() {
    let body = r#"{"schemaVersion": 2, "layers": [{"size": 10}]}"#;
    let document =
        ManifestDocument::from_bytes(body.as_bytes(), Some(MEDIA_TYPE_OCI_MANIFEST_V1)).unwrap();
    assert!(matches!(document, ManifestDocument::OciManifest(_)));
}

#[test]
fn test_body_media_type_wins_over_content_type() {
    let document =
        ManifestDocument::from_bytes(DOCKER_MANIFEST.as_bytes(), Some(MEDIA_TYPE_OCI_INDEX_V1))
            .unwrap();
    assert_eq!(document.media_type(), MediaType::DockerManifestV2);
}

#[test]
fn test_decode_empty_body() {
    for body in ["", "   ", "null"] {
        let err = ManifestDocument::from_bytes(body.as_bytes(), None).unwrap_err();
        assert!(matches!(err, BadgeError::InvalidManifest { .. }), "{body:?}");
    }
}

#[test]
fn test_decode_non_json_body() {
    let err = ManifestDocument::from_bytes(b"<html>not found</html>", None).unwrap_err();
    assert!(matches!(err, BadgeError::InvalidManifest { .. }));
}

#[test]
fn test_decode_error_body() {
    let body = r#"{"errors":[{"code":"MANIFEST_UNKNOWN","message":"manifest unknown"}]}"#;
    let err = ManifestDocument::from_bytes(body.as_bytes(), None).unwrap_err();
    assert!(matches!(err, BadgeError::InvalidManifest { .. }));
    assert!(err.to_string().contains("MANIFEST_UNKNOWN"));
}

#[test]
fn test_decode_unknown_media_type() {
    let body = r#"{"mediaType": "application/vnd.docker.distribution.manifest.v1+prettyjws"}"#;
    let err = ManifestDocument::from_bytes(body.as_bytes(), None).unwrap_err();
    match err {
        BadgeError::InvalidMediaType { media_type } => {
            assert_eq!(
                media_type,
                "application/vnd.docker.distribution.manifest.v1+prettyjws"
            );
        }
        other => panic!("Expected InvalidMediaType, got {:?}", other),
    }
}

#[test]
fn test_decode_missing_media_type() {
    let err = ManifestDocument::from_bytes(br#"{"schemaVersion": 2}"#, None).unwrap_err();
    assert!(matches!(err, BadgeError::InvalidMediaType { .. }));
}

#[test]
fn test_decode_wrong_shape() {
    let body = r#"{"mediaType": "application/vnd.oci.image.index.v1+json", "manifests": "nope"}"#;
    let err = ManifestDocument::from_bytes(body.as_bytes(), None).unwrap_err();
    assert!(matches!(err, BadgeError::InvalidManifest { .. }));
}

#[test]
fn test_empty_manifest_list() {
    let body = r#"{"mediaType": "application/vnd.docker.distribution.manifest.list.v2+json", "manifests": []}"#;
    let ManifestDocument::DockerManifestList(list) =
        ManifestDocument::from_bytes(body.as_bytes(), None).unwrap()
    else {
        panic!("Expected DockerManifestList");
    };
    let err = list.first_entry().unwrap_err();
    assert!(matches!(err, BadgeError::InvalidManifest { .. }));
}

#[test]
fn test_manifest_list_entry_without_digest() {
    let list = ManifestList {
        manifests: vec![Descriptor::default()],
        ..Default::default()
    };
    let err = list.first_entry().unwrap_err();
    assert!(err.to_string().contains("Digest"));
}

#[test]
fn test_total_size() {
    let manifest = Manifest {
        config: Some(Descriptor {
            size: 100,
            ..Default::default()
        }),
        layers: vec![
            Descriptor {
                size: 200,
                ..Default::default()
            },
            Descriptor {
                size: 300,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    assert_eq!(manifest.config_size(), 100);
    assert_eq!(manifest.layers_size().unwrap(), 500);
    assert_eq!(manifest.total_size().unwrap(), 600);
}

#[test]
fn test_total_size_missing_sizes_count_as_zero() {
    let body = r#"{
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "layers": [{"digest": "sha256:aa"}, {"size": 42}]
    }"#;
    let ManifestDocument::OciManifest(manifest) =
        ManifestDocument::from_bytes(body.as_bytes(), None).unwrap()
    else {
        panic!("Expected OciManifest");
    };
    assert_eq!(manifest.total_size().unwrap(), 42);
}

#[test]
fn test_total_size_overflow_is_invalid_manifest() {
    let body = r#"{
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "config": {"size": 1},
        "layers": [{"size": 18446744073709551615}]
    }"#;
    let ManifestDocument::OciManifest(manifest) =
        ManifestDocument::from_bytes(body.as_bytes(), None).unwrap()
    else {
        panic!("Expected OciManifest");
    };
    assert_eq!(manifest.layers_size().unwrap(), u64::MAX);

    let err = manifest.total_size().unwrap_err();
    assert!(matches!(err, BadgeError::InvalidManifest { .. }));
}

#[test]
fn test_layers_size_overflow_is_invalid_manifest() {
    let manifest = Manifest {
        layers: vec![
            Descriptor {
                size: u64::MAX,
                ..Default::default()
            },
            Descriptor {
                size: 2,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    assert!(matches!(
        manifest.layers_size().unwrap_err(),
        BadgeError::InvalidManifest { .. }
    ));
}
