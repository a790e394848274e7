use std::str::FromStr;

use crate::{
    api::error,
    modules::{
        admin::pin::PIN_LENGTH,
        meme::{GridFilter, MemeCategory, MemeQuery, SortKey, SortOrder, StatusFilter},
    },
};

pub const HELP: &str = "\
Commands:
  help                                   show this list
  list [all|trending|recent|most-downloaded]
                                         browse the meme wall
  hot                                    trending strip (most downloaded)
  search <term>                          search titles, file names and tags
  view <id>                              open a meme (counts a view)
  download <id>                          download a meme (counts a download)
  login <pin>                            unlock the admin panel
  logout                                 lock the admin panel
  upload <file> [size-bytes]             upload a video (admin)
  edit <id> <title>|<tags>|<category>|<score>
                                         edit a meme (admin)
  delete <id...>                         delete memes (admin)
  db [status] [date|views|downloads|score|title] [asc|desc] [term]
                                         meme database, every status (admin)
  logs                                   admin activity log (admin)
  quit                                   exit";

/// One console line, parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    List(GridFilter),
    Hot,
    Search(String),
    View(String),
    Download(String),
    Login(String),
    Logout,
    Upload { filename: String, size: u64 },
    Edit { id: String, title: String, tags: String, category: MemeCategory, score: String },
    Delete(Vec<String>),
    Database(MemeQuery),
    Logs,
    Quit,
}

/// Size assumed for `upload <file>` when none is given
const DEFAULT_UPLOAD_SIZE: u64 = 2 * 1024 * 1024;

fn required<'a>(arg: Option<&'a str>, usage: &'static str) -> Result<&'a str, error::Error> {
    match arg.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error::Error::bad_request(format!("Usage: {usage}"))),
    }
}

impl FromStr for Command {
    type Err = error::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (line, None),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "list" => match rest {
                Some(filter) if !filter.is_empty() => {
                    Command::List(filter.parse().map_err(error::Error::bad_request)?)
                }
                _ => Command::List(GridFilter::All),
            },
            "hot" => Command::Hot,
            "search" => Command::Search(rest.unwrap_or_default().to_string()),
            "view" => Command::View(required(rest, "view <id>")?.to_string()),
            "download" => Command::Download(required(rest, "download <id>")?.to_string()),
            "login" => {
                let pin = required(rest, "login <pin>")?;
                if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(error::Error::bad_request("PIN must be exactly 4 digits"));
                }
                Command::Login(pin.to_string())
            }
            "logout" => Command::Logout,
            "upload" => {
                let args = required(rest, "upload <file> [size-bytes]")?;
                let mut parts = args.split_whitespace();
                let filename = parts.next().unwrap_or_default().to_string();
                let size = match parts.next() {
                    Some(raw) => raw.parse().map_err(|_| {
                        error::Error::bad_request(format!("'{raw}' is not a byte count"))
                    })?,
                    None => DEFAULT_UPLOAD_SIZE,
                };
                Command::Upload { filename, size }
            }
            "edit" => {
                let usage = "edit <id> <title>|<tags>|<category>|<score>";
                let args = required(rest, usage)?;
                let (id, form) = args
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| error::Error::bad_request(format!("Usage: {usage}")))?;
                let fields: Vec<&str> = form.split('|').map(str::trim).collect();
                let [title, tags, category, score] = fields[..] else {
                    return Err(error::Error::bad_request(format!("Usage: {usage}")));
                };
                Command::Edit {
                    id: id.to_string(),
                    title: title.to_string(),
                    tags: tags.to_string(),
                    category: category.parse().map_err(error::Error::bad_request)?,
                    score: score.to_string(),
                }
            }
            "delete" => {
                let ids = required(rest, "delete <id...>")?;
                Command::Delete(ids.split_whitespace().map(String::from).collect())
            }
            "db" => {
                let mut query = MemeQuery::default();
                let mut words = rest.unwrap_or_default().split_whitespace().peekable();
                // options first, everything after them is the search term
                while let Some(word) = words.peek() {
                    if let Ok(status) = word.parse::<StatusFilter>() {
                        query.status = status;
                    } else if let Ok(key) = word.parse::<SortKey>() {
                        query.sort_by = key;
                    } else if let Ok(order) = word.parse::<SortOrder>() {
                        query.order = order;
                    } else {
                        break;
                    }
                    words.next();
                }
                Command::Database(query.search(words.collect::<Vec<_>>().join(" ")))
            }
            "logs" => Command::Logs,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(error::Error::bad_request(format!(
                    "Unknown command '{other}', type 'help'"
                )))
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("help".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("  LIST ".parse::<Command>().unwrap(), Command::List(GridFilter::All));
        assert_eq!(
            "list most-downloaded".parse::<Command>().unwrap(),
            Command::List(GridFilter::Category(MemeCategory::MostDownloaded))
        );
        assert_eq!("search cat vibes".parse::<Command>().unwrap(), Command::Search("cat vibes".into()));
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            "upload cat.mp4 1024".parse::<Command>().unwrap(),
            Command::Upload { filename: "cat.mp4".into(), size: 1024 }
        );
        assert_eq!(
            "upload dog.mp4".parse::<Command>().unwrap(),
            Command::Upload { filename: "dog.mp4".into(), size: DEFAULT_UPLOAD_SIZE }
        );
        assert!("upload dog.mp4 big".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_edit_form() {
        let command = "edit sample-1 Funny Cat | cat, funny | trending | 88".parse::<Command>().unwrap();
        assert_eq!(
            command,
            Command::Edit {
                id: "sample-1".into(),
                title: "Funny Cat".into(),
                tags: "cat, funny".into(),
                category: MemeCategory::Trending,
                score: "88".into(),
            }
        );
        assert!("edit sample-1 only a title".parse::<Command>().is_err());
    }

    #[test]
    fn test_login_needs_exactly_four_digits() {
        assert_eq!("login 0919".parse::<Command>().unwrap(), Command::Login("0919".into()));
        assert!("login 09195".parse::<Command>().is_err());
        assert!("login 09a19".parse::<Command>().is_err());
        assert!("login 091".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_database_listing() {
        assert_eq!("db".parse::<Command>().unwrap(), Command::Database(MemeQuery::default()));
        assert_eq!(
            "db error title asc dancing dog".parse::<Command>().unwrap(),
            Command::Database(
                MemeQuery::default()
                    .status(StatusFilter::Only(crate::modules::meme::MemeStatus::Error))
                    .sort(SortKey::Title, SortOrder::Asc)
                    .search("dancing dog")
            )
        );
        assert_eq!(
            "db cats".parse::<Command>().unwrap(),
            Command::Database(MemeQuery::default().search("cats"))
        );
    }

    #[test]
    fn test_missing_arguments_and_unknown_commands() {
        assert!("view".parse::<Command>().is_err());
        assert!("delete   ".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("list weekly".parse::<Command>().is_err());
    }
}
