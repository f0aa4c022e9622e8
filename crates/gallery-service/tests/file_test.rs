//! Integration tests for file placement, upload, deletion, and queries.

mod helpers;

use bytes::Bytes;
use rand::SeedableRng;
use rand::rngs::StdRng;

use gallery_client::MemoryFolderApi;
use gallery_client::dto::{FolderListing, RemoteFolderNode};
use gallery_core::config::gallery::GalleryConfig;
use gallery_core::error::ErrorKind;
use gallery_core::types::{SortDirection, SortKey};
use gallery_entity::{Category, MediaType};
use gallery_service::GalleryQuery;

use helpers::{TestGallery, media_file};

#[tokio::test]
async fn test_move_into_branch_lands_in_first_leaf() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "A").await.unwrap();
    gallery.manager.create_subfolder("Branding/A", "B").await.unwrap();
    gallery.seed_file("Branding", media_file(42, "hero.jpg")).await;

    let placed = gallery.manager.move_file_to_folder(42, "branding-a").await.unwrap();
    assert_eq!(placed, "branding-a-b");

    let tree = gallery.tree().await;
    assert!(tree.find_by_id("branding-a").unwrap().file_ids.is_empty());
    assert_eq!(tree.find_by_id("branding-a-b").unwrap().file_ids, vec![42]);
    assert!(tree.category(Category::Branding).unwrap().root_file_ids.is_empty());
}

#[tokio::test]
async fn test_move_is_idempotent() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "A").await.unwrap();
    gallery.manager.create_subfolder("Presentations", "B").await.unwrap();
    gallery.seed_file("Branding/A", media_file(7, "deck.pdf")).await;

    gallery.manager.move_file_to_folder(7, "presentations-b").await.unwrap();
    gallery.manager.move_file_to_folder(7, "presentations-b").await.unwrap();

    let tree = gallery.tree().await;
    assert!(tree.find_by_id("branding-a").unwrap().file_ids.is_empty());
    assert_eq!(tree.find_by_id("presentations-b").unwrap().file_ids, vec![7]);
}

#[tokio::test]
async fn test_move_with_unknown_references_fails() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "A").await.unwrap();
    gallery.seed_file("Branding/A", media_file(1, "a.jpg")).await;

    let err = gallery.manager.move_file_to_folder(1, "missing").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = gallery.manager.move_file_to_folder(99, "branding-a").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(gallery.tree().await.find_by_id("branding-a").unwrap().file_ids, vec![1]);
}

#[tokio::test]
async fn test_distribute_across_two_categories() {
    let mut branding = RemoteFolderNode::new("Branding", "Branding");
    branding.file_ids = vec![1, 2, 3, 4];
    branding.children.push(RemoteFolderNode::new("Logos", "Branding/Logos"));
    let mut presentations = RemoteFolderNode::new("Presentations", "Presentations");
    presentations
        .children
        .push(RemoteFolderNode::new("Decks", "Presentations/Decks"));

    let api = MemoryFolderApi::with_listing(FolderListing {
        folders: vec![branding, presentations],
        files: (1..=4).map(|id| media_file(id, &format!("{id}.jpg"))).collect(),
    });
    let gallery = TestGallery::with_api(api).await;

    let mut rng = StdRng::seed_from_u64(42);
    let assignments = gallery
        .manager
        .distribute_files_randomly_with(&[1, 2, 3, 4], &mut rng)
        .await;
    assert_eq!(assignments.len(), 2);

    let tree = gallery.tree().await;
    let logos = &tree.find_by_id("branding-logos").unwrap().file_ids;
    let decks = &tree.find_by_id("presentations-decks").unwrap().file_ids;
    assert_eq!(logos.len(), 2);
    assert_eq!(decks.len(), 2);

    let mut union: Vec<_> = logos.iter().chain(decks).copied().collect();
    union.sort_unstable();
    assert_eq!(union, vec![1, 2, 3, 4]);
    assert!(tree.category(Category::Branding).unwrap().root_file_ids.is_empty());
}

#[tokio::test]
async fn test_distribute_creates_unsorted_leaves() {
    let gallery = TestGallery::new().await;
    gallery.seed_file("Ad Content", media_file(1, "a.jpg")).await;
    gallery.seed_file("Ad Content", media_file(2, "b.jpg")).await;

    let assignments = gallery.manager.distribute_files_randomly().await;
    assert_eq!(assignments.len(), Category::ALL.len());
    assert!(assignments.iter().all(|a| a.path.ends_with("/Unsorted")));
    assert_eq!(assignments.iter().map(|a| a.file_ids.len()).sum::<usize>(), 2);
}

#[tokio::test]
async fn test_unusable_unsorted_name_falls_back_to_default() {
    let config = GalleryConfig {
        unsorted_folder_name: "Raw/Footage".to_string(),
        ..GalleryConfig::default()
    };
    let gallery = TestGallery::with_config(MemoryFolderApi::new(), config).await;
    gallery.seed_file("Other Files", media_file(1, "a.jpg")).await;

    let assignments = gallery.manager.distribute_files_randomly().await;
    assert!(assignments.iter().all(|a| a.path.split('/').count() == 2));

    let tree = gallery.tree().await;
    let idx = tree.find_by_path("Other Files/Unsorted").unwrap();
    assert_eq!(tree.node(idx).id, "other-files-unsorted");
    assert_eq!(tree.node(idx).depth(), 1);
}

#[tokio::test]
async fn test_remove_file_clears_every_reference() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "A").await.unwrap();
    gallery.seed_file("Branding/A", media_file(5, "e.jpg")).await;

    gallery.manager.remove_file(5).await.unwrap();

    let state = gallery.manager.snapshot().await;
    assert!(state.files.is_empty());
    assert!(state.tree.find_by_id("branding-a").unwrap().file_ids.is_empty());
    assert_eq!(gallery.manager.remove_file(5).await.unwrap_err().kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upload_into_leaf_and_category_root() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("All Footages", "Raw").await.unwrap();

    gallery
        .manager
        .upload_file("All Footages/Raw", "take1.mp4", "video/mp4", Bytes::from_static(b"abc"))
        .await
        .unwrap();
    gallery
        .manager
        .upload_file("All Footages", "poster.png", "image/png", Bytes::from_static(b"png"))
        .await
        .unwrap();

    let state = gallery.manager.snapshot().await;
    assert_eq!(state.files.len(), 2);
    assert_eq!(state.tree.find_by_id("all-footages-raw").unwrap().file_ids.len(), 1);
    assert_eq!(
        state.tree.category(Category::AllFootages).unwrap().root_file_ids.len(),
        1
    );
    let video = state.files.iter().find(|f| f.name == "take1.mp4").unwrap();
    assert_eq!(video.media_type, MediaType::Video);
}

#[tokio::test]
async fn test_upload_into_branch_rejected_without_request() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "A").await.unwrap();
    gallery.manager.create_subfolder("Branding/A", "B").await.unwrap();
    let before = gallery.requests();

    let err = gallery
        .manager
        .upload_file("Branding/A", "x.png", "image/png", Bytes::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = gallery
        .manager
        .upload_file("Branding/Z", "x.png", "image/png", Bytes::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(gallery.requests(), before);
}

#[tokio::test]
async fn test_delete_file_by_url() {
    let gallery = TestGallery::new().await;
    gallery.seed_file("Branding", media_file(3, "old.png")).await;

    gallery.manager.delete_file(3).await.unwrap();
    let state = gallery.manager.snapshot().await;
    assert!(state.files.is_empty());
    assert!(state.tree.category(Category::Branding).unwrap().root_file_ids.is_empty());

    let before = gallery.requests();
    let err = gallery.manager.delete_file(3).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(gallery.requests(), before);
}

#[tokio::test]
async fn test_delete_file_with_repeated_name_removes_only_that_file() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "Logos").await.unwrap();
    for content in [&b"first"[..], &b"second"[..]] {
        gallery
            .manager
            .upload_file("Branding/Logos", "logo.png", "image/png", Bytes::copy_from_slice(content))
            .await
            .unwrap();
    }
    let ids: Vec<_> = gallery.manager.snapshot().await.files.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2]);

    gallery.manager.delete_file(2).await.unwrap();

    let state = gallery.manager.snapshot().await;
    assert_eq!(state.files.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1]);
    assert_eq!(state.tree.find_by_id("branding-logos").unwrap().file_ids, vec![1]);
}

#[tokio::test]
async fn test_toggle_favorite_feeds_favorites_filter() {
    let gallery = TestGallery::new().await;
    gallery.seed_file("Branding", media_file(1, "a.png")).await;
    gallery.seed_file("Branding", media_file(2, "b.png")).await;
    let before = gallery.requests();

    assert!(gallery.manager.toggle_favorite(2).await.unwrap());
    let favorites = GalleryQuery {
        favorites_only: true,
        ..GalleryQuery::default()
    };
    let names: Vec<_> = gallery
        .manager
        .query_files(&favorites)
        .await
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["b.png"]);

    assert!(!gallery.manager.toggle_favorite(2).await.unwrap());
    assert!(gallery.manager.query_files(&favorites).await.is_empty());

    let err = gallery.manager.toggle_favorite(99).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(gallery.requests(), before);
}

#[tokio::test]
async fn test_query_filters_by_origin_category() {
    let gallery = TestGallery::new().await;
    gallery
        .manager
        .upload_file("Customer Reviews", "review.mp4", "video/mp4", Bytes::from_static(b"mp4"))
        .await
        .unwrap();
    gallery
        .manager
        .upload_file("Ad Content", "ad.png", "image/png", Bytes::from_static(b"png"))
        .await
        .unwrap();

    let query = GalleryQuery {
        category: Some("Customer Reviews".to_string()),
        ..GalleryQuery::default()
    };
    let names: Vec<_> = gallery
        .manager
        .query_files(&query)
        .await
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["review.mp4"]);
}

#[tokio::test]
async fn test_query_follows_breadcrumb() {
    let gallery = TestGallery::new().await;
    gallery.manager.create_subfolder("Branding", "Logos").await.unwrap();

    let mut older = media_file(1, "older.png");
    older.date = "2024-03-01".to_string();
    let mut newer = media_file(2, "newer.png");
    newer.date = "2025-03-01".to_string();
    gallery.seed_file("Branding/Logos", older).await;
    gallery.seed_file("Branding/Logos", newer).await;
    gallery.seed_file("Customer Reviews", media_file(3, "review.png")).await;

    let all = gallery.manager.query_files(&GalleryQuery::default()).await;
    assert_eq!(all.len(), 3);

    gallery.manager.open_category(Category::Branding).await.unwrap();
    let names: Vec<_> = gallery
        .manager
        .query_files(&GalleryQuery::default())
        .await
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["newer.png", "older.png"]);

    gallery.manager.open_folder("branding-logos").await.unwrap();
    let query = GalleryQuery {
        sort_by: SortKey::Date,
        direction: SortDirection::Asc,
        ..GalleryQuery::default()
    };
    let names: Vec<_> = gallery
        .manager
        .query_files(&query)
        .await
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["older.png", "newer.png"]);
}
