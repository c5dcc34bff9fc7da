//! Asset lifecycle tests against a mock catalog API.
//!
//! Every test stands up a wiremock server playing both the catalog API and the
//! pre-signed upload target, then checks which requests were made and in what
//! order.

mod common;

use common::*;
use dreamstreamer::{
    catalog::{AssetFile, CatalogClient},
    error::CatalogError,
    types::{AlbumFields, ArtistFields, CatalogFilter, GenreFields, TrackFields},
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png(name: &str) -> AssetFile {
    AssetFile::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

fn mp3(name: &str) -> AssetFile {
    AssetFile::new(name, "audio/mpeg", vec![0xff, 0xfb, 0x90, 0x00])
}

/// Mounts an upload destination for `file_name` in `folder` that stores the
/// object under `key`.
async fn mount_upload(server: &MockServer, file_name: &str, folder: &str, key: &str) {
    Mock::given(method("POST"))
        .and(path("/s3FileHandler"))
        .and(body_partial_json(json!({
            "fileName": file_name,
            "folderName": folder
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadURL": format!("{}/presigned/{}", server.uri(), key),
            "fileKey": key
        })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/presigned/{}", key)))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_asset_delete(server: &MockServer, status: u16) {
    Mock::given(method("DELETE"))
        .and(path("/s3FileHandler"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn asset_deletes(server: &MockServer) -> Vec<serde_json::Value> {
    requests(server)
        .await
        .iter()
        .filter(|r| r.method.as_str() == "DELETE" && r.url.path() == "/s3FileHandler")
        .map(json_body)
        .collect()
}

// =============================================================================
// Object Store
// =============================================================================

mod object_store {
    use super::*;

    #[tokio::test]
    async fn test_upload_returns_public_url_and_sends_bytes() {
        let server = MockServer::start().await;
        mount_upload(&server, "cover.png", "albums", "cover-1.png").await;
        let client = signed_in_client(&server);

        let url = client
            .storage()
            .upload(png("cover.png"), "albums")
            .await
            .expect("upload succeeds");

        assert_eq!(url, public_url("cover-1.png"));

        let requests = requests(&server).await;
        assert_eq!(requests.len(), 2);
        assert_eq!(
            json_body(&requests[0]),
            json!({
                "fileName": "cover.png",
                "fileType": "image/png",
                "folderName": "albums"
            })
        );
        assert_eq!(requests[1].method.as_str(), "PUT");
        assert_eq!(requests[1].body, vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(
            requests[1]
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
    }

    #[tokio::test]
    async fn test_upload_refused_destination_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/s3FileHandler"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let result = client.storage().upload(png("cover.png"), "albums").await;

        assert!(matches!(result, Err(CatalogError::Upload(_))));
    }

    #[tokio::test]
    async fn test_failed_transfer_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/s3FileHandler"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadURL": format!("{}/presigned/x.png", server.uri()),
                "fileKey": "x.png"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let result = client.storage().upload(png("x.png"), "genres").await;

        assert!(matches!(result, Err(CatalogError::Upload(_))));
    }

    #[tokio::test]
    async fn test_remove_sends_trailing_key_and_folder() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/s3FileHandler"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "fileUrl": "song-9.mp3",
                "folderName": "tracks/songs"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        client
            .storage()
            .remove(&public_url("song-9.mp3"), "tracks/songs")
            .await
            .expect("remove succeeds");
    }

    #[tokio::test]
    async fn test_remove_failure_is_delete_error() {
        let server = MockServer::start().await;
        mount_asset_delete(&server, 500).await;
        let client = signed_in_client(&server);

        let result = client
            .storage()
            .remove(&public_url("gone.png"), "artists")
            .await;

        assert!(matches!(result, Err(CatalogError::Delete(_))));
    }

    #[tokio::test]
    async fn test_upload_without_session_is_auth_error() {
        let server = MockServer::start().await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let result = client.storage().upload(png("a.png"), "albums").await;

        assert!(matches!(result, Err(CatalogError::Auth(_))));
        assert!(requests(&server).await.is_empty());
    }
}

// =============================================================================
// Create
// =============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_genre_with_image() {
        let server = MockServer::start().await;
        mount_upload(&server, "lofi.png", "genres", "lofi-1.png").await;
        Mock::given(method("POST"))
            .and(path("/genres"))
            .and(body_partial_json(json!({
                "name": "Lo-fi",
                "imageUrl": public_url("lofi-1.png")
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 7,
                "name": "Lo-fi",
                "image_url": public_url("lofi-1.png")
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let created = client
            .genres()
            .create(
                &GenreFields {
                    name: "Lo-fi".to_string(),
                },
                Some(png("lofi.png")),
            )
            .await
            .expect("genre is created");

        let genre = created.record.expect("genre is echoed");
        assert_eq!(genre.id, 7);
        assert_eq!(genre.image_url, Some(public_url("lofi-1.png")));
        assert_eq!(
            request_log(&server).await,
            vec![
                "POST /s3FileHandler",
                "PUT /presigned/lofi-1.png",
                "POST /genres"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_without_asset_sends_null_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artists"))
            .and(body_partial_json(json!({
                "name": "Nujabes",
                "artistImageUrl": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 3,
                "name": "Nujabes"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let artist = client
            .artists()
            .create(
                &ArtistFields {
                    name: "Nujabes".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("artist is created")
            .record
            .expect("artist is echoed");

        assert_eq!(artist.name, "Nujabes");
        assert_eq!(request_log(&server).await, vec!["POST /artists"]);
    }

    #[tokio::test]
    async fn test_acknowledged_create_keeps_upload() {
        let server = MockServer::start().await;
        mount_upload(&server, "lofi.png", "genres", "lofi-1.png").await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/genres"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"message": "Genre created successfully"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let created = client
            .genres()
            .create(
                &GenreFields {
                    name: "Lo-fi".to_string(),
                },
                Some(png("lofi.png")),
            )
            .await
            .expect("an acknowledged create succeeds");

        assert!(created.record.is_none());
        assert_eq!(created.message.as_deref(), Some("Genre created successfully"));
        assert!(asset_deletes(&server).await.is_empty());
        assert_eq!(
            request_log(&server).await,
            vec![
                "POST /s3FileHandler",
                "PUT /presigned/lofi-1.png",
                "POST /genres"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_with_empty_body_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artists"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let created = client
            .artists()
            .create(
                &ArtistFields {
                    name: "Nujabes".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("an empty 201 succeeds");

        assert!(created.record.is_none());
        assert!(created.message.is_none());
    }

    #[tokio::test]
    async fn test_missing_name_makes_no_request() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server);

        let result = client
            .genres()
            .create(
                &GenreFields {
                    name: "   ".to_string(),
                },
                Some(png("lofi.png")),
            )
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert!(requests(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_track_without_song_makes_no_request() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server);

        let result = client
            .tracks()
            .create(
                &TrackFields {
                    title: "Aruarian Dance".to_string(),
                    ..Default::default()
                },
                Some(png("cover.png")),
                None,
            )
            .await;

        match result {
            Err(CatalogError::Validation(msg)) => assert!(msg.contains("song")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(requests(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_track_uploads_both_assets_before_record() {
        let server = MockServer::start().await;
        mount_upload(&server, "cover.png", "tracks/images", "cover-2.png").await;
        mount_upload(&server, "aruarian.mp3", "tracks/songs", "aruarian-2.mp3").await;
        Mock::given(method("POST"))
            .and(path("/tracks"))
            .and(body_partial_json(json!({
                "title": "Aruarian Dance",
                "artistIds": [3],
                "imageUrl": public_url("cover-2.png"),
                "songUrl": public_url("aruarian-2.mp3")
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11,
                "title": "Aruarian Dance",
                "image_url": public_url("cover-2.png"),
                "song_url": public_url("aruarian-2.mp3")
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let track = client
            .tracks()
            .create(
                &TrackFields {
                    title: "Aruarian Dance".to_string(),
                    artist_ids: vec![3],
                    ..Default::default()
                },
                Some(png("cover.png")),
                Some(mp3("aruarian.mp3")),
            )
            .await
            .expect("track is created")
            .record
            .expect("track is echoed");

        assert_eq!(track.song_url, Some(public_url("aruarian-2.mp3")));
        let log = request_log(&server).await;
        assert_eq!(log.len(), 5);
        assert_eq!(log.last().map(String::as_str), Some("POST /tracks"));
    }

    #[tokio::test]
    async fn test_failed_create_removes_fresh_upload() {
        let server = MockServer::start().await;
        mount_upload(&server, "cover.png", "albums", "cover-3.png").await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/albums"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Artist does not exist"})),
            )
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let result = client
            .albums()
            .create(
                &AlbumFields {
                    title: "Modal Soul".to_string(),
                    artist_id: Some(404),
                    ..Default::default()
                },
                Some(png("cover.png")),
            )
            .await;

        match result {
            Err(CatalogError::RecordOperation { message, .. }) => {
                assert_eq!(message, "Artist does not exist")
            }
            other => panic!("Expected RecordOperation error, got {:?}", other),
        }
        assert_eq!(
            asset_deletes(&server).await,
            vec![json!({"fileUrl": "cover-3.png", "folderName": "albums"})]
        );
    }

    #[tokio::test]
    async fn test_second_upload_failure_removes_first() {
        let server = MockServer::start().await;
        mount_upload(&server, "cover.png", "tracks/images", "cover-4.png").await;
        Mock::given(method("POST"))
            .and(path("/s3FileHandler"))
            .and(body_partial_json(json!({"folderName": "tracks/songs"})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_asset_delete(&server, 200).await;
        let client = signed_in_client(&server);

        let result = client
            .tracks()
            .create(
                &TrackFields {
                    title: "Feather".to_string(),
                    ..Default::default()
                },
                Some(png("cover.png")),
                Some(mp3("feather.mp3")),
            )
            .await;

        assert!(matches!(result, Err(CatalogError::Upload(_))));
        assert_eq!(
            asset_deletes(&server).await,
            vec![json!({"fileUrl": "cover-4.png", "folderName": "tracks/images"})]
        );
        assert!(
            !request_log(&server)
                .await
                .contains(&"POST /tracks".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_create_without_backend_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/genres"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let err = client
            .genres()
            .create(
                &GenreFields {
                    name: "Jazz".to_string(),
                },
                None,
            )
            .await
            .expect_err("create fails");

        assert_eq!(err.user_message(), "Failed to create genre");
    }
}

// =============================================================================
// Edit
// =============================================================================

mod edit {
    use super::*;

    #[tokio::test]
    async fn test_edit_without_asset_sends_null_and_removes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/albums"))
            .and(query_param("id", "5"))
            .and(body_partial_json(json!({
                "id": 5,
                "title": "Modal Soul (Remaster)",
                "artworkUrl": null
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Album updated"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client
            .albums()
            .edit(
                5,
                &AlbumFields {
                    title: "Modal Soul (Remaster)".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .expect("edit succeeds");

        assert!(outcome.is_clean());
        assert_eq!(outcome.value.message.as_deref(), Some("Album updated"));
        assert!(outcome.value.record.is_none());
        assert!(asset_deletes(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_reported_url_for_unreplaced_slot_is_kept() {
        let server = MockServer::start().await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("PUT"))
            .and(path("/genres"))
            .and(body_partial_json(json!({"name": "Jazz", "imageUrl": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "oldImageUrl": public_url("live.png")
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client
            .genres()
            .edit(
                3,
                &GenreFields {
                    name: "Jazz".to_string(),
                },
                None,
            )
            .await
            .expect("edit succeeds");

        assert!(outcome.is_clean());
        assert!(asset_deletes(&server).await.is_empty());
        assert_eq!(request_log(&server).await, vec!["PUT /genres"]);
    }

    #[tokio::test]
    async fn test_edit_with_replacement_removes_superseded_after_update() {
        let server = MockServer::start().await;
        mount_upload(&server, "new.png", "artists", "new-1.png").await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("PUT"))
            .and(path("/artists"))
            .and(body_partial_json(json!({
                "artistImageUrl": public_url("new-1.png")
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Artist updated",
                "oldArtistImageUrl": public_url("old-1.png")
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client
            .artists()
            .edit(
                3,
                &ArtistFields {
                    name: "Nujabes".to_string(),
                    ..Default::default()
                },
                Some(png("new.png")),
            )
            .await
            .expect("edit succeeds");

        assert!(outcome.is_clean());
        assert_eq!(
            request_log(&server).await,
            vec![
                "POST /s3FileHandler",
                "PUT /presigned/new-1.png",
                "PUT /artists",
                "DELETE /s3FileHandler"
            ]
        );
        assert_eq!(
            asset_deletes(&server).await,
            vec![json!({"fileUrl": "old-1.png", "folderName": "artists"})]
        );
    }

    #[tokio::test]
    async fn test_failed_superseded_removal_is_a_warning() {
        let server = MockServer::start().await;
        mount_upload(&server, "new.png", "genres", "new-2.png").await;
        mount_asset_delete(&server, 500).await;
        Mock::given(method("PUT"))
            .and(path("/genres"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "oldImageUrl": public_url("old-2.png")
            })))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client
            .genres()
            .edit(
                7,
                &GenreFields {
                    name: "Lo-fi".to_string(),
                },
                Some(png("new.png")),
            )
            .await
            .expect("edit still succeeds");

        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(outcome.warnings[0], CatalogError::Delete(_)));
    }

    #[tokio::test]
    async fn test_failed_update_removes_fresh_upload_and_keeps_old() {
        let server = MockServer::start().await;
        mount_upload(&server, "new.png", "albums", "new-3.png").await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("PUT"))
            .and(path("/albums"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let err = client
            .albums()
            .edit(
                5,
                &AlbumFields {
                    title: "Modal Soul".to_string(),
                    ..Default::default()
                },
                Some(png("new.png")),
            )
            .await
            .expect_err("edit fails");

        assert_eq!(err.user_message(), "db down");
        assert_eq!(
            asset_deletes(&server).await,
            vec![json!({"fileUrl": "new-3.png", "folderName": "albums"})]
        );
    }

    #[tokio::test]
    async fn test_edit_track_song_only_replaces_song() {
        let server = MockServer::start().await;
        mount_upload(&server, "v2.mp3", "tracks/songs", "v2.mp3").await;
        mount_asset_delete(&server, 200).await;
        Mock::given(method("PUT"))
            .and(path("/tracks"))
            .and(body_partial_json(json!({
                "imageUrl": null,
                "songUrl": public_url("v2.mp3")
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "oldImageUrl": public_url("cover-1.png"),
                "oldSongUrl": public_url("v1.mp3")
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client
            .tracks()
            .edit(
                11,
                &TrackFields {
                    title: "Feather".to_string(),
                    ..Default::default()
                },
                None,
                Some(mp3("v2.mp3")),
            )
            .await
            .expect("edit succeeds");

        assert!(outcome.is_clean());
        assert_eq!(
            asset_deletes(&server).await,
            vec![json!({"fileUrl": "v1.mp3", "folderName": "tracks/songs"})]
        );
    }

    #[tokio::test]
    async fn test_edit_missing_title_makes_no_request() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server);

        let result = client
            .albums()
            .edit(5, &AlbumFields::default(), Some(png("new.png")))
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert!(requests(&server).await.is_empty());
    }
}

// =============================================================================
// Delete
// =============================================================================

mod delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_removes_record_then_assets() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tracks"))
            .and(query_param("id", "11"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_asset_delete(&server, 200).await;
        let client = signed_in_client(&server);

        let outcome = client
            .tracks()
            .delete(
                11,
                Some(public_url("cover-2.png")),
                Some(public_url("aruarian-2.mp3")),
            )
            .await
            .expect("delete succeeds");

        assert!(outcome.is_clean());
        assert_eq!(
            request_log(&server).await,
            vec![
                "DELETE /tracks",
                "DELETE /s3FileHandler",
                "DELETE /s3FileHandler"
            ]
        );
        assert_eq!(
            asset_deletes(&server).await,
            vec![
                json!({"fileUrl": "cover-2.png", "folderName": "tracks/images"}),
                json!({"fileUrl": "aruarian-2.mp3", "folderName": "tracks/songs"})
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_record_delete_keeps_assets() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/albums"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "Album still has tracks"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/s3FileHandler"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let err = client
            .albums()
            .delete(5, Some(public_url("cover-3.png")))
            .await
            .expect_err("delete fails");

        assert_eq!(err.user_message(), "Album still has tracks");
    }

    #[tokio::test]
    async fn test_delete_without_assets_only_deletes_record() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/genres"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let client = signed_in_client(&server);

        let outcome = client.genres().delete(7, None).await.expect("delete succeeds");

        assert!(outcome.is_clean());
        assert_eq!(request_log(&server).await, vec!["DELETE /genres"]);
    }

    #[tokio::test]
    async fn test_asset_cleanup_failure_is_a_warning() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/artists"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        mount_asset_delete(&server, 500).await;
        let client = signed_in_client(&server);

        let outcome = client
            .artists()
            .delete(3, Some(public_url("nujabes.png")))
            .await
            .expect("record delete still succeeds");

        assert_eq!(outcome.warnings.len(), 1);
    }
}

// =============================================================================
// Reads
// =============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn test_list_tracks_sends_only_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracks"))
            .and(query_param("genreId", "7"))
            .and(query_param("trackTitle", "rain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Rain", "duration": 215, "artist_names": "Nujabes"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let tracks = client
            .tracks()
            .list(&CatalogFilter {
                genre_id: Some(7),
                artist_id: None,
                title: Some("rain".to_string()),
            })
            .await
            .expect("list succeeds");

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].duration.as_deref(), Some("215"));
        let query = requests(&server).await[0].url.query().unwrap_or("").to_string();
        assert!(!query.contains("artistId"));
    }

    #[tokio::test]
    async fn test_album_title_filter_matches_tracks_too() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/albums"))
            .and(query_param("albumTitle", "soul"))
            .and(query_param("trackTitle", "soul"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let albums = client
            .albums()
            .list(&CatalogFilter {
                title: Some("soul".to_string()),
                ..Default::default()
            })
            .await
            .expect("list succeeds");

        assert!(albums.is_empty());
    }

    #[tokio::test]
    async fn test_album_details_include_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/albums"))
            .and(query_param("albumId", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "title": "Modal Soul",
                "release_year": 2005,
                "artwork_url": public_url("modal.png"),
                "tracks": [{"id": 11, "title": "Feather"}]
            })))
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let album = client.albums().get(5).await.expect("album found");

        assert_eq!(album.release_year.as_deref(), Some("2005"));
        assert_eq!(album.tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_genre_tracks_by_genre_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genres"))
            .and(query_param("genreId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Rain", "genre_name": "Lo-fi"},
                {"id": 2, "title": "Snow", "genre_name": "Lo-fi"}
            ])))
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let tracks = client.genres().tracks(7).await.expect("tracks found");

        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.genre_name.as_deref() == Some("Lo-fi")));
    }

    #[tokio::test]
    async fn test_genre_list_filters_by_artist_and_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genres"))
            .and(query_param("artistId", "3"))
            .and(query_param("genreName", "jazz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "name": "Jazz Hop"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let genres = client
            .genres()
            .list(&CatalogFilter {
                artist_id: Some(3),
                title: Some("jazz".to_string()),
                ..Default::default()
            })
            .await
            .expect("genres load");

        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].name, "Jazz Hop");
    }

    #[tokio::test]
    async fn test_unknown_genre_is_record_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genres"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Jazz"}
            ])))
            .mount(&server)
            .await;
        let client = CatalogClient::new(settings(&server)).expect("client builds");

        let result = client.genres().get(99).await;

        assert!(matches!(result, Err(CatalogError::RecordOperation { .. })));
    }
}
