//! Static menu content
//!
//! The catalog holds every text the bot can send and the menu tables that
//! map an input token to a reply and a successor step. Built-in defaults are
//! the village texts; a JSON file with the same shape can override any
//! top-level field at startup.

use crate::state_machine::{normalize_input, ConvState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One row of a menu table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Reply body. When omitted the welcome text is sent instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Numeric code of the step to move to (see `ConvState::code`)
    pub next_step: u8,
}

impl MenuOption {
    fn new(reply: impl Into<String>, next: ConvState) -> Self {
        Self {
            reply: Some(reply.into()),
            next_step: next.code(),
        }
    }

    fn welcome(next: ConvState) -> Self {
        Self {
            reply: None,
            next_step: next.code(),
        }
    }
}

/// All static texts and menu tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub start_keyword: String,
    pub continue_keyword: String,
    pub exit_keyword: String,
    pub welcome: String,
    pub main_menu: BTreeMap<String, MenuOption>,
    pub service_menu: BTreeMap<String, MenuOption>,
    pub continue_prompt: String,
    pub start_hint: String,
    pub invalid_number: String,
    pub invalid_continue: String,
    pub farewell: String,
    pub restart_apology: String,
    pub generic_apology: String,
}

const WELCOME: &str = "*Selamat datang di Layanan Desa Muara Tinobu!*

Kami disini untuk membantu Anda dalam memberikan informasi.
*Jam Kerja Pukul 08.00 WITA-15.00 WITA.*

Pilih salah satu opsi berikut untuk mendapatkan informasi lebih lanjut:
1. Profil Desa
2. Struktur Organisasi Desa
3. Peta Desa
4. Layanan Desa
5. Kontak Kami
6. Verifikasi Berita Hoax";

const PROFILE: &str = "Muara Tinobu adalah sebuah desa yang terletak di Kecamatan Lasolo, Kabupaten Konawe Utara, Sulawesi Tenggara. Luas desa ini adalah 52 hektare dan terbagi menjadi beberapa bagian yaitu:
Tanah perkebunan, Tanah pertanian, Pekarangan, Pemukiman, Perikanan, dan lahan pengembangan.

Untuk informasi lebih lanjut silahkan akses link berikut:
https://muaratinobudesa.wordpress.com/tentang/";

const ORGANIZATION: &str = "Silahkan akses link berikut untuk melihat tampilan struktur organisasi:
https://muaratinobudesa.wordpress.com/pemerintah-desa/";

const MAP: &str = "Silahkan akses link berikut untuk melihat peta lokasi desa:
https://muaratinobudesa.wordpress.com/peta-desa/";

const SERVICES: &str = "Kami menyediakan layanan pembuatan. Pembuatan apa yang ingin Anda ketahui:
1. Kartu Tanda Penduduk (KTP)
2. Surat Keterangan Domisili
0. Kembali";

const CONTACT: &str = "Silahkan akses link berikut untuk menghubungin kami:
https://muaratinobudesa.wordpress.com/kontak/";

const HOAX_CHECK: &str = "Silahkan akses link berikut untuk cek kebenaran dari sebuah berita:
https://cekfakta.tempo.co/";

const KTP: &str = "Silahkan akses link berikut untuk pembuatan KTP:
https://muaratinobudesa.wordpress.com/ktp/

Kami akan melayani pembuatan KTP secepatnya.";

const DOMICILE: &str = "Silahkan akses link berikut untuk pembuatan surat Domisili:
https://muaratinobudesa.wordpress.com/suket-domisili/

Kami akan melayani pembuatan surat tersebut secepatnya.";

const CONTINUE_PROMPT: &str =
    "Apakah Anda ingin melanjutkan?\n\nKetik *\"YA\"* untuk melihat menu.\nKetik *\"TIDAK\"* untuk selesai.";

const INVALID_CONTINUE: &str =
    "*Pilihan Salah* ⚠️\n\nKetik \"YA\" untuk melanjutkan\nKetik \"TIDAK\" untuk mengakhiri";

impl Default for Catalog {
    fn default() -> Self {
        let main_menu = BTreeMap::from([
            ("1".to_string(), MenuOption::new(PROFILE, ConvState::ContinueOrExit)),
            ("2".to_string(), MenuOption::new(ORGANIZATION, ConvState::ContinueOrExit)),
            ("3".to_string(), MenuOption::new(MAP, ConvState::ContinueOrExit)),
            ("4".to_string(), MenuOption::new(SERVICES, ConvState::ServiceMenu)),
            ("5".to_string(), MenuOption::new(CONTACT, ConvState::ContinueOrExit)),
            ("6".to_string(), MenuOption::new(HOAX_CHECK, ConvState::ContinueOrExit)),
        ]);
        let service_menu = BTreeMap::from([
            ("1".to_string(), MenuOption::new(KTP, ConvState::ContinueOrExit)),
            ("2".to_string(), MenuOption::new(DOMICILE, ConvState::ContinueOrExit)),
            ("0".to_string(), MenuOption::welcome(ConvState::MainMenu)),
        ]);

        Self {
            start_keyword: "rabu".to_string(),
            continue_keyword: "ya".to_string(),
            exit_keyword: "tidak".to_string(),
            welcome: WELCOME.to_string(),
            main_menu,
            service_menu,
            continue_prompt: CONTINUE_PROMPT.to_string(),
            start_hint: "Mohon ketik \"rabu\" untuk memulai".to_string(),
            invalid_number: "*Pilih dengan ketik angka yang tersedia!*".to_string(),
            invalid_continue: INVALID_CONTINUE.to_string(),
            farewell:
                "Terima kasih telah menggunakan layanan kami. Untuk memulai kembali ketik \"rabu\""
                    .to_string(),
            restart_apology:
                "Terjadi kesalahan. Silakan mulai ulang dengan mengetik \"rabu\".".to_string(),
            generic_apology: "Maaf, terjadi kesalahan. Silakan coba lagi nanti.".to_string(),
        }
    }
}

impl Catalog {
    /// Load a catalog from a JSON file. Fields absent from the file keep
    /// their built-in values.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        Ok(catalog.normalized())
    }

    /// Load from `path` if given, falling back to the built-in catalog on error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(
                    path = %path.display(),
                    main_options = catalog.main_menu.len(),
                    service_options = catalog.service_menu.len(),
                    "Loaded content catalog"
                );
                catalog
            }
            Err(e) => {
                tracing::error!(error = %e, "Using built-in content catalog");
                Self::default()
            }
        }
    }

    /// Reply text for an option, resolving an omitted reply to the welcome text
    pub fn reply_for<'a>(&'a self, option: &'a MenuOption) -> &'a str {
        option.reply.as_deref().unwrap_or(&self.welcome)
    }

    // Tokens are compared against normalized input, so normalize them too.
    fn normalized(mut self) -> Self {
        self.start_keyword = normalize_input(&self.start_keyword);
        self.continue_keyword = normalize_input(&self.continue_keyword);
        self.exit_keyword = normalize_input(&self.exit_keyword);
        self.main_menu = normalize_keys(self.main_menu);
        self.service_menu = normalize_keys(self.service_menu);
        self
    }
}

fn normalize_keys(menu: BTreeMap<String, MenuOption>) -> BTreeMap<String, MenuOption> {
    menu.into_iter()
        .map(|(token, option)| (normalize_input(&token), option))
        .collect()
}
