use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

pub const DEFAULT_PROFILE_IMAGE: &str = "/profile.jpeg";

const MENU: [(&str, &str, &str); 7] = [
    ("Webinar", "/dashboard/webinar", "/icons/webinar.png"),
    ("eLearning Courses", "/dashboard/elearning", "/icons/elearning.png"),
    ("Live Operative Workshops", "/dashboard/workshops", "/icons/workshop.png"),
    ("Conferences", "/dashboard/conferences", "/icons/conference.png"),
    ("Speakers", "/dashboard/speakers", "/icons/speaker.png"),
    ("My Profile", "/dashboard/myprofile", "/icons/my-profile.png"),
    ("My Purchases", "/dashboard/mypurchase", "/icons/my-purchases.png"),
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
    pub icon: String,
    pub active: bool,
}

pub fn menu(current_path: Option<&str>) -> Vec<MenuItem> {
    MENU.iter()
        .map(|&(label, path, icon)| MenuItem {
            label: label.to_string(),
            path: path.to_string(),
            icon: icon.to_string(),
            active: current_path == Some(path),
        })
        .collect()
}

/// Absolute `http` references are kept, relative ones are served by the
/// backend, and a missing one falls back to the default avatar.
pub fn resolve_image_url(path: Option<&str>, base: &Url) -> String {
    match path {
        Some(p) if p.starts_with("http") => p.to_string(),
        Some(p) if !p.is_empty() => {
            format!("{}{}", base.as_str().trim_end_matches('/'), p)
        }
        _ => DEFAULT_PROFILE_IMAGE.to_string(),
    }
}
