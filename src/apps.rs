//! Static description of the media stack: which apps exist, where their
//! secrets live, which port they listen on and how they map onto Prowlarr
//! sync categories.

use std::fmt;

/// Name of the indexer aggregator every automation app is registered with.
pub const AGGREGATOR: &str = "prowlarr";

/// Automation apps, in the order they are configured.
pub const AUTOMATION_APPS: [&str; 6] = [
    "sonarr",
    "sonarr-4k",
    "sonarr-anime",
    "radarr",
    "radarr-4k",
    "lidarr",
];

/// An application whose API key lives in the secret store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSpec {
    pub name: &'static str,
    /// Field label inside the `{name}-secret` item.
    pub secret_field: &'static str,
    /// Port of the in-cluster service.
    pub port: u16,
}

impl AppSpec {
    /// Secret store item holding this app's API key.
    pub fn secret_item(&self) -> String {
        format!("{}-secret", self.name)
    }
}

pub const APPS: [AppSpec; 7] = [
    AppSpec {
        name: "prowlarr",
        secret_field: "PROWLARR__AUTH__APIKEY",
        port: 9696,
    },
    AppSpec {
        name: "sonarr",
        secret_field: "SONARR__AUTH__APIKEY",
        port: 8989,
    },
    AppSpec {
        name: "sonarr-4k",
        secret_field: "SONARR__AUTH__APIKEY",
        port: 8989,
    },
    AppSpec {
        name: "sonarr-anime",
        secret_field: "SONARR__AUTH__APIKEY",
        port: 8989,
    },
    AppSpec {
        name: "radarr",
        secret_field: "RADARR__AUTH__APIKEY",
        port: 7878,
    },
    AppSpec {
        name: "radarr-4k",
        secret_field: "RADARR__AUTH__APIKEY",
        port: 7878,
    },
    AppSpec {
        name: "lidarr",
        secret_field: "LIDARR__AUTH__APIKEY",
        port: 8686,
    },
];

/// Look up an app by name.
pub fn find_app(name: &str) -> Option<&'static AppSpec> {
    APPS.iter().find(|app| names_match(app.name, name))
}

/// Case-insensitive identity comparison for remote entries.
///
/// Prowlarr application entries and *arr download clients are keyed by name
/// only. All "does this entry already exist" checks go through here.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Strip instance suffixes (`-4k`, `-anime`) to get the app kind.
pub fn base_kind(name: &str) -> String {
    name.replace("-4k", "").replace("-anime", "")
}

/// Prowlarr implementation name for an app kind.
pub fn implementation_for(kind: &str) -> Option<&'static str> {
    match kind {
        "sonarr" => Some("Sonarr"),
        "radarr" => Some("Radarr"),
        "lidarr" => Some("Lidarr"),
        _ => None,
    }
}

/// Newznab categories Prowlarr syncs to the given app.
///
/// TV: 5000 TV, 5030 WEB-DL, 5040 HD, 5045 UHD, 5070 Anime.
/// Movies: 2000 Movies, 2030 WEB-DL, 2040 HD, 2045 UHD.
/// Audio: 3000 Audio, 3010 MP3, 3040 Lossless.
pub fn sync_categories(name: &str) -> Vec<i32> {
    let mut categories = match base_kind(name).as_str() {
        "sonarr" => vec![5000, 5030, 5040, 5045],
        "radarr" => vec![2000, 2030, 2040, 2045],
        "lidarr" => vec![3000, 3010, 3040],
        _ => vec![2000],
    };

    if base_kind(name) == "sonarr" && name.contains("anime") {
        categories.push(5070);
    }

    categories
}

/// API path version used by an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V3,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prowlarr and Lidarr expose `/api/v1`, Sonarr and Radarr `/api/v3`.
pub fn api_version(name: &str) -> ApiVersion {
    match base_kind(&name.to_lowercase()).as_str() {
        "prowlarr" | "lidarr" => ApiVersion::V1,
        _ => ApiVersion::V3,
    }
}
