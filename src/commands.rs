//! The command line surface.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use lexopt::{Arg, Parser, ValueExt as _};
use slog_scope::{debug, info};
use url::Url;

use newtab_types::settings::SettingKey;
use newtab_types::wallpaper::WallpaperKind;

use crate::appearance::Appearance;
use crate::config;
use crate::error::Error;
use crate::notify::{self, ConsoleNotifier, Notification, Notifier};
use crate::settings::{decode, defaults, SettingsStore};
use crate::shortcuts::ShortcutDraft;
use crate::storage::{FileStorage, Storage};
use crate::util;
use crate::wallpaper::bing::BingClient;
use crate::wallpaper::{upload, BackgroundSlot, WallpaperResolver, WallpaperSource};

pub const USAGE: &str = "\
Usage: newtab [--profile NAME] [--config PATH] <command>

Commands:
  get KEY                       Print a setting
  set KEY VALUE                 Store a setting; VALUE is JSON or plain text
  export [DIR]                  Write all settings to a dated file in DIR
  import FILE [--yes]           Replace settings with those in FILE
  shortcuts list
  shortcuts add --name NAME --url URL [--icon URL] [--position N]
  shortcuts edit ID [--name NAME] [--url URL] [--icon URL] [--position N]
  shortcuts delete ID
  wallpaper show
  wallpaper set TYPE [VALUE]    TYPE is none, bing, url or file
  wallpaper upload FILE         Use a local PNG, JPEG, GIF or WebP image
  wallpaper resolve             Print the image the page would display
  style                         Print the CSS derived from the settings
";

/// Shortcut fields given on the command line. Missing fields are derived when adding and kept
/// when editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutFields {
    pub name: Option<String>,
    pub href: Option<String>,
    pub icon_url: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Get { key: SettingKey },
    Set { key: SettingKey, value: String },
    Export { dir: PathBuf },
    Import { file: PathBuf, yes: bool },
    ListShortcuts,
    AddShortcut(ShortcutFields),
    EditShortcut { id: String, fields: ShortcutFields },
    DeleteShortcut { id: String },
    ShowWallpaper,
    SetWallpaper { kind: WallpaperKind, value: Option<String> },
    UploadWallpaper { file: PathBuf },
    ResolveWallpaper,
    Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub profile: Option<String>,
    pub config: Option<PathBuf>,
    pub command: Command,
}

fn positional(args: &mut Parser, name: &str) -> Result<OsString, Error> {
    match args.next()? {
        Some(Arg::Value(value)) => Ok(value),
        Some(arg) => Err(arg.unexpected().into()),
        None => Err(Error::usage(format!("Missing required argument {name}"))),
    }
}

fn finish(args: &mut Parser) -> Result<(), Error> {
    match args.next()? {
        Some(arg) => Err(arg.unexpected().into()),
        None => Ok(()),
    }
}

fn parse_key(value: OsString) -> Result<SettingKey, Error> {
    Ok(value.parse_with(|s| {
        s.parse::<SettingKey>()
            .map_err(|_| format!("Unknown setting {s:?}"))
    })?)
}

fn parse_shortcut_fields(args: &mut Parser, id: &mut Option<String>) -> Result<ShortcutFields, Error> {
    use lexopt::Arg::*;

    let mut fields = ShortcutFields::default();
    while let Some(arg) = args.next()? {
        match arg {
            Long("name") => fields.name = Some(args.value()?.string()?),
            Long("url") => fields.href = Some(args.value()?.string()?),
            Long("icon") => fields.icon_url = Some(args.value()?.string()?),
            Long("position") => fields.position = Some(args.value()?.parse()?),
            Value(value) if id.is_none() => *id = Some(value.string()?),
            arg => return Err(arg.unexpected().into()),
        }
    }
    Ok(fields)
}

fn parse_shortcuts(args: &mut Parser) -> Result<Command, Error> {
    let sub = positional(args, "SUBCOMMAND")?.string()?;
    Ok(match sub.as_str() {
        "list" => {
            finish(args)?;
            Command::ListShortcuts
        }
        "add" => {
            let mut id = None;
            let fields = parse_shortcut_fields(args, &mut id)?;
            if let Some(id) = id {
                return Err(Error::usage(format!("Unexpected argument {id:?}")));
            }
            Command::AddShortcut(fields)
        }
        "edit" => {
            let mut id = None;
            let fields = parse_shortcut_fields(args, &mut id)?;
            let id = id.ok_or_else(|| Error::usage("Missing required argument ID"))?;
            Command::EditShortcut { id, fields }
        }
        "delete" => {
            let id = positional(args, "ID")?.string()?;
            finish(args)?;
            Command::DeleteShortcut { id }
        }
        _ => return Err(Error::usage(format!("Unknown shortcuts command {sub:?}"))),
    })
}

fn parse_wallpaper(args: &mut Parser) -> Result<Command, Error> {
    let sub = positional(args, "SUBCOMMAND")?.string()?;
    Ok(match sub.as_str() {
        "show" => {
            finish(args)?;
            Command::ShowWallpaper
        }
        "set" => {
            let kind = positional(args, "TYPE")?.parse_with(|s| {
                s.parse::<WallpaperKind>()
                    .map_err(|_| format!("Unknown wallpaper type {s:?}"))
            })?;
            let value = match args.next()? {
                Some(Arg::Value(value)) => Some(value.string()?),
                Some(arg) => return Err(arg.unexpected().into()),
                None => None,
            };
            finish(args)?;
            Command::SetWallpaper { kind, value }
        }
        "upload" => {
            let file = positional(args, "FILE")?.into();
            finish(args)?;
            Command::UploadWallpaper { file }
        }
        "resolve" => {
            finish(args)?;
            Command::ResolveWallpaper
        }
        _ => return Err(Error::usage(format!("Unknown wallpaper command {sub:?}"))),
    })
}

pub fn parse(mut args: Parser) -> Result<Invocation, Error> {
    use lexopt::Arg::*;

    let mut profile = None::<String>;
    let mut config = None::<PathBuf>;

    let name = loop {
        match args.next()? {
            Some(Long("profile") | Short('p')) => {
                let name = args.value()?.string()?;
                if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
                    return Err(Error::usage(format!("Invalid profile name {name:?}")));
                }
                profile = Some(name);
            }
            Some(Long("config")) => config = Some(args.value()?.into()),
            Some(Long("help") | Short('h')) | None => {
                return Ok(Invocation {
                    profile,
                    config,
                    command: Command::Help,
                });
            }
            Some(Value(name)) => break name.string()?,
            Some(arg) => return Err(arg.unexpected().into()),
        }
    };

    let command = match name.as_str() {
        "get" => {
            let key = parse_key(positional(&mut args, "KEY")?)?;
            finish(&mut args)?;
            Command::Get { key }
        }
        "set" => {
            let key = parse_key(positional(&mut args, "KEY")?)?;
            let value = positional(&mut args, "VALUE")?.string()?;
            finish(&mut args)?;
            Command::Set { key, value }
        }
        "export" => {
            let dir = match args.next()? {
                Some(Value(dir)) => dir.into(),
                Some(arg) => return Err(arg.unexpected().into()),
                None => PathBuf::from("."),
            };
            finish(&mut args)?;
            Command::Export { dir }
        }
        "import" => {
            let mut file = None::<PathBuf>;
            let mut yes = false;
            while let Some(arg) = args.next()? {
                match arg {
                    Long("yes") | Short('y') => yes = true,
                    Value(value) if file.is_none() => file = Some(value.into()),
                    arg => return Err(arg.unexpected().into()),
                }
            }
            let file = file.ok_or_else(|| Error::usage("Missing required argument FILE"))?;
            Command::Import { file, yes }
        }
        "shortcuts" => parse_shortcuts(&mut args)?,
        "wallpaper" => parse_wallpaper(&mut args)?,
        "style" => {
            finish(&mut args)?;
            Command::Style
        }
        "help" => Command::Help,
        _ => return Err(Error::usage(format!("Unknown command {name:?}"))),
    };

    Ok(Invocation {
        profile,
        config,
        command,
    })
}

/// Asks a yes/no question, defaulting to no.
fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> io::Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn favicon_for(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.host_str().map(defaults::favicon_url)
}

/// Everything a command runs against.
pub struct Session<S, W, N> {
    pub settings: SettingsStore<S>,
    pub resolver: WallpaperResolver<W>,
    pub background: BackgroundSlot,
    pub notifier: N,
    pub today: NaiveDate,
}

impl<S: Storage, W: WallpaperSource, N: Notifier> Session<S, W, N> {
    pub fn new(settings: SettingsStore<S>, source: W, notifier: N, today: NaiveDate) -> Self {
        Self {
            settings,
            resolver: WallpaperResolver::new(source),
            background: BackgroundSlot::default(),
            notifier,
            today,
        }
    }

    pub async fn execute(
        &self,
        command: Command,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<(), Error> {
        debug!("Executing {command:?}");
        match command {
            Command::Help => write!(out, "{USAGE}")?,
            Command::Get { key } => {
                let default = defaults::value_for(key).unwrap_or_default();
                let value = self.settings.read(key, default);
                let text = serde_json::to_string_pretty(&value).context("Failed to format value")?;
                writeln!(out, "{text}")?;
            }
            Command::Set { key, value } => {
                self.settings
                    .write(key, &decode(&value))
                    .with_context(|| format!("Failed to set {key}"))?;
            }
            Command::Export { dir } => {
                let path = self
                    .settings
                    .export_to_dir(&dir, self.today, &self.notifier)
                    .context("Failed to export settings")?;
                writeln!(out, "{}", path.display())?;
            }
            Command::Import { file, yes } => self.import(file, yes, input, out)?,
            Command::ListShortcuts => {
                for shortcut in self.settings.list_shortcuts() {
                    writeln!(
                        out,
                        "{:>3}  {}  {}  ({})",
                        shortcut.position, shortcut.name, shortcut.href, shortcut.id
                    )?;
                }
            }
            Command::AddShortcut(fields) => {
                let href = fields.href.unwrap_or_default();
                let icon_url = match fields.icon_url {
                    Some(icon_url) => icon_url,
                    None => favicon_for(&href).unwrap_or_default(),
                };
                let shortcut = self
                    .settings
                    .add_shortcut(ShortcutDraft {
                        name: fields.name.unwrap_or_default(),
                        href,
                        icon_url,
                        position: fields.position,
                    })
                    .context("Failed to add shortcut")?;
                writeln!(out, "{}", shortcut.id)?;
            }
            Command::EditShortcut { id, fields } => {
                let current = self
                    .settings
                    .shortcuts()
                    .into_iter()
                    .find(|s| s.id.as_str() == id);
                let Some(current) = current else {
                    return Err(anyhow::anyhow!("No shortcut with id {id:?}").into());
                };
                self.settings
                    .edit_shortcut(
                        &id,
                        ShortcutDraft {
                            name: fields.name.unwrap_or_else(|| current.name.to_string()),
                            href: fields.href.unwrap_or(current.href),
                            icon_url: fields.icon_url.unwrap_or(current.icon_url),
                            position: Some(fields.position.unwrap_or(current.position)),
                        },
                    )
                    .context("Failed to edit shortcut")?;
            }
            Command::DeleteShortcut { id } => {
                self.settings
                    .delete_shortcut(&id)
                    .context("Failed to delete shortcut")?;
            }
            Command::ShowWallpaper => {
                let config = self.settings.wallpaper_config();
                let text =
                    serde_json::to_string_pretty(&config).context("Failed to format value")?;
                writeln!(out, "{text}")?;
            }
            Command::SetWallpaper { kind, value } => {
                let mut config = self.settings.wallpaper_config().with_kind(kind);
                if let Some(value) = value {
                    if !kind.has_value() {
                        return Err(Error::usage(format!(
                            "A {} wallpaper takes no value",
                            kind.as_str()
                        )));
                    }
                    config.value = Some(value);
                }
                self.settings
                    .set_wallpaper_config(&config)
                    .context("Failed to save the wallpaper")?;
            }
            Command::UploadWallpaper { file } => {
                let config = upload::load(&file).context("Failed to upload the wallpaper")?;
                self.settings
                    .set_wallpaper_config(&config)
                    .context("Failed to save the wallpaper")?;
            }
            Command::ResolveWallpaper => {
                let config = self.settings.wallpaper_config();
                self.resolver
                    .resolve_into(
                        &self.background,
                        &config,
                        &self.settings,
                        &self.notifier,
                        self.today,
                    )
                    .await;
                match self.background.image() {
                    Some(image) => writeln!(out, "{image}")?,
                    None => writeln!(out, "none")?,
                }
            }
            Command::Style => {
                let appearance = Appearance::from_settings(&self.settings);
                let text =
                    serde_json::to_string_pretty(&appearance).context("Failed to format value")?;
                writeln!(out, "{text}")?;
            }
        }
        Ok(())
    }

    fn import(
        &self,
        file: PathBuf,
        yes: bool,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<(), Error> {
        let text = std::fs::read_to_string(&file)
            .inspect_err(|_| {
                self.notifier
                    .notify(Notification::error(notify::IMPORT_ERROR_INVALID_FILE))
            })
            .with_context(|| format!("Failed to read {file:?}"))?;
        let document = self
            .settings
            .prepare_import(&text, &self.notifier)
            .context("Invalid settings file")?;

        let prompt = format!(
            "Importing will overwrite {} settings. Continue?",
            document.keys().count()
        );
        if !yes && !confirm(input, out, &prompt)? {
            info!("Import of {file:?} declined");
            return Err(Error::Aborted);
        }

        let outcome = self
            .settings
            .apply_import(document, &self.notifier)
            .context("Failed to import settings")?;
        writeln!(out, "Imported {} settings", outcome.imported.len())?;
        if outcome.reload_required {
            writeln!(out, "Reload open pages to apply them.")?;
        }
        Ok(())
    }
}

/// Parses the process arguments and runs the command against the selected profile.
pub async fn run(args: Parser) -> Result<(), Error> {
    let Invocation {
        profile,
        config,
        command,
    } = parse(args)?;
    if command == Command::Help {
        print!("{USAGE}");
        return Ok(());
    }

    let config = config::load(config.as_deref())?;
    let profile = profile.unwrap_or_else(|| config.default_profile.to_string());
    let storage = FileStorage::for_profile(&profile)
        .with_context(|| format!("Failed to open the storage of profile {profile:?}"))?;
    info!("Using profile {profile:?} at {:?}", storage.path());

    let source = BingClient::new(
        reqwest::Client::new(),
        &config.bing_endpoint,
        config.bing_resolution,
        &config.bing_market,
    );
    let session = Session::new(
        SettingsStore::new(storage),
        source,
        ConsoleNotifier,
        util::today(),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    session
        .execute(command, &mut stdin.lock(), &mut stdout.lock())
        .await
}
