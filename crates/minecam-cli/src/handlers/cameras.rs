//! Camera listing, stream addresses and enhancement status.

use anyhow::Result;
use minecam_core::{Camera, CameraStatus};

use crate::bootstrap::ClientContext;
use crate::parser::ClientArgs;
use crate::presentation::{format_optional, print_separator, truncate_string};

fn status_label(camera: &Camera) -> &'static str {
    match camera.status {
        Some(CameraStatus::Online) => "online",
        Some(CameraStatus::Offline) => "offline",
        None => "--",
    }
}

/// Execute the cameras command.
pub async fn list(args: &ClientArgs) -> Result<()> {
    let ctx = ClientContext::open(args)?;
    let cameras = ctx.authorized()?.cameras().await?;

    if cameras.is_empty() {
        println!("No cameras configured on the server.");
        return Ok(());
    }

    let selected = ctx.session.ui_state().selected_camera;
    println!(
        "  {:<12} {:<20} {:<18} {:<8} RTSP",
        "ID", "Name", "Location", "Status"
    );
    print_separator(90);
    for camera in &cameras {
        let marker = if selected.as_deref() == Some(camera.camera_id.as_str()) {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} {:<12} {:<20} {:<18} {:<8} {}",
            truncate_string(&camera.camera_id, 12),
            truncate_string(&format_optional(camera.name.as_ref(), "--"), 20),
            truncate_string(&format_optional(camera.location.as_ref(), "--"), 18),
            status_label(camera),
            camera.rtsp_url
        );
    }
    Ok(())
}

/// Execute the stream command; the camera becomes the selected one.
pub async fn stream(args: &ClientArgs, camera_id: &str) -> Result<()> {
    let mut ctx = ClientContext::open(args)?;
    let urls = ctx.authorized()?.stream_urls(camera_id).await?;
    ctx.session.select_camera(&urls.camera_id)?;

    println!("{} ({})", urls.camera_name, urls.camera_location);
    println!("original: {}", urls.original_stream_url);
    println!("enhanced: {}", urls.enhanced_stream_url);
    Ok(())
}

/// Execute the status command.
pub async fn status(args: &ClientArgs, camera_id: &str) -> Result<()> {
    let ctx = ClientContext::open(args)?;
    let status = ctx.authorized()?.enhancement_status(camera_id).await?;

    println!("camera:   {}", status.camera_id);
    println!(
        "state:    {}",
        if status.is_running { "enhancing" } else { "offline" }
    );
    println!("fps:      {:.2}", status.fps);
    if let Some(params) = status.params {
        println!("lut:      {} (strength {:.2})", params.lut_enabled, params.lut_strength);
        println!("clahe:    {} (clip {:.2})", params.clahe_enabled, params.clahe_clip_limit);
        println!("gamma:    {:.2}", params.effective_gamma());
    }
    Ok(())
}
