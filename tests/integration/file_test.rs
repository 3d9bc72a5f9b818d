//! Attached files over local storage.

use bytes::Bytes;

use backoffice_core::error::ErrorKind;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_upload_list_and_delete() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    let files = &app.services.files;

    let file = files
        .upload(juan.id, "carnet.pdf", Bytes::from_static(b"%PDF-1.4"), None)
        .await
        .unwrap();
    assert_eq!(file.mime_type, "application/pdf");
    assert_eq!(file.size, 8);
    assert!(file.url.starts_with("http://files/"));
    assert_eq!(files.list(juan.id).await.unwrap().len(), 1);

    files.delete(&file).await.unwrap();
    assert!(files.list(juan.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejects_unaccepted_and_oversized_files() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    let files = &app.services.files;

    let err = files
        .upload(juan.id, "notes.txt", Bytes::from_static(b"hola"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let big = Bytes::from(vec![0u8; 2048]);
    let err = files
        .upload(juan.id, "scan.png", big, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(files.list(juan.id).await.unwrap().is_empty());
}
