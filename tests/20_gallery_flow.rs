mod common;

use anyhow::{Context, Result};
use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::json;
use std::process::Command;

// Minimal JPEG header bytes; the server never inspects image content
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00];

fn run_cli(args: &[&str]) -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_gallery"))
        .args(args)
        .output()
        .context("failed to run gallery CLI")?;

    anyhow::ensure!(
        output.status.success(),
        "gallery {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

async fn admin_token(server: &common::TestServer, client: &reqwest::Client) -> Result<String> {
    let username = format!("admin-{}", std::process::id());

    // Safe to repeat within one run: the CLI refuses duplicate usernames
    let _ = Command::new(env!("CARGO_BIN_EXE_gallery"))
        .args(["superuser", "create", &username, "test-password"])
        .output();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .form(&[("username", username.as_str()), ("password", "test-password")])
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let token = body["access_token"]
        .as_str()
        .context("missing access_token")?
        .to_string();
    Ok(token)
}

async fn create_painting(
    server: &common::TestServer,
    client: &reqwest::Client,
    token: &str,
    title: &str,
    tags: &str,
) -> Result<serde_json::Value> {
    let form = multipart::Form::new()
        .text("title", title.to_string())
        .text("width", "100.50")
        .text("height", "70")
        .text("tags", tags.to_string())
        .text("description", "Oil on canvas")
        .part(
            "images",
            multipart::Part::bytes(FAKE_JPEG.to_vec())
                .file_name("sunset.jpg")
                .mime_str("image/jpeg")?,
        );

    let res = client
        .post(format!("{}/api/paintings", server.base_url))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
    Ok(res.json().await?)
}

#[tokio::test]
#[ignore = "needs a running Postgres reachable via DATABASE_URL"]
async fn full_catalog_flow() -> Result<()> {
    run_cli(&["migrate"])?;

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = admin_token(server, &client).await?;

    let marker = format!("flow-{}", std::process::id());
    let title = format!("Sunset over the bay {}", marker);

    let painting =
        create_painting(server, &client, &token, &title, &format!("oil,{}", marker)).await?;
    let id = painting["id"].as_i64().context("missing id")?;
    assert_eq!(painting["width"], "100.50");
    assert_eq!(painting["tags"][1], marker.as_str());
    let filename = painting["photo_filenames"][0]
        .as_str()
        .context("missing filename")?
        .to_string();

    // Uploaded image is served back under /media
    let res = client
        .get(format!("{}/media/{}", server.base_url, filename))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await?.as_ref(), FAKE_JPEG);

    // Anonymous filtered browse finds it
    let res = client
        .get(format!(
            "{}/api/paintings?tags={}&title=sunset",
            server.base_url, marker
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = res.json::<serde_json::Value>().await?;
    assert!(listed
        .as_array()
        .context("expected array")?
        .iter()
        .any(|p| p["id"] == painting["id"]));

    // Out-of-range dimension filter excludes it
    let res = client
        .get(format!(
            "{}/api/paintings?tags={}&width_min=500",
            server.base_url, marker
        ))
        .send()
        .await?;
    let listed = res.json::<serde_json::Value>().await?;
    assert!(listed.as_array().context("expected array")?.is_empty());

    // Count honours the same filters
    let res = client
        .get(format!("{}/api/paintings/count?tags={}", server.base_url, marker))
        .send()
        .await?;
    let count = res.json::<serde_json::Value>().await?;
    assert_eq!(count["total"], 1);

    // Tag listing includes ours
    let res = client
        .get(format!("{}/api/paintings/tags/all", server.base_url))
        .send()
        .await?;
    let tags = res.json::<Vec<String>>().await?;
    assert!(tags.contains(&marker));

    // At least one page of content exists now
    let res = client
        .get(format!("{}/api/paintings/pages/total", server.base_url))
        .send()
        .await?;
    let pages = res.json::<serde_json::Value>().await?;
    assert!(pages["total_pages"].as_i64().context("missing total_pages")? >= 1);

    // Update the title without sending new images; photos survive
    let form = multipart::Form::new().text("title", format!("Renamed {}", marker));
    let res = client
        .put(format!("{}/api/paintings/{}", server.base_url, id))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["title"], format!("Renamed {}", marker).as_str());
    assert_eq!(updated["photo_filenames"][0], filename.as_str());

    // Visitor feedback goes through without any token
    let res = client
        .post(format!("{}/api/feedback", server.base_url))
        .json(&json!({
            "user_name": "Jane Doe",
            "phone_number": "+1 555 0100",
            "painting_id": id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let feedback = res.json::<serde_json::Value>().await?;
    assert_eq!(feedback["painting_id"], id);
    assert!(feedback["user_session_id"].as_i64().is_some());

    // Deleting the painting removes the row, its feedback and its files
    let res = client
        .delete(format!("{}/api/paintings/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/paintings/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/media/{}", server.base_url, filename))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Feedback for a painting that no longer exists is a 404
    let res = client
        .post(format!("{}/api/feedback", server.base_url))
        .json(&json!({
            "user_name": "Jane Doe",
            "phone_number": "+1 555 0100",
            "painting_id": id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a running Postgres reachable via DATABASE_URL"]
async fn each_feedback_gets_its_own_session() -> Result<()> {
    run_cli(&["migrate"])?;

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = admin_token(server, &client).await?;

    let marker = format!("session-{}", std::process::id());
    let painting = create_painting(
        server,
        &client,
        &token,
        &format!("Quiet field {}", marker),
        &marker,
    )
    .await?;
    let id = painting["id"].as_i64().context("missing id")?;

    let mut session_ids = Vec::new();
    for name in ["First Visitor", "Second Visitor"] {
        let res = client
            .post(format!("{}/api/feedback", server.base_url))
            .json(&json!({
                "user_name": name,
                "phone_number": "+1 555 0101",
                "painting_id": id
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let feedback = res.json::<serde_json::Value>().await?;
        session_ids.push(
            feedback["user_session_id"]
                .as_i64()
                .context("missing session id")?,
        );
    }

    assert_ne!(session_ids[0], session_ids[1], "each feedback must own a fresh session");

    // Cleanup so reruns stay tidy
    let res = client
        .delete(format!("{}/api/paintings/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
