use clap::ValueEnum;
use cs_core::CallScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SearchKind {
    Google,
    Maps,
    Beenverified,
    Apollo,
}

impl SearchKind {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(raw, true).ok()
    }
}

/// Prospect details a search link can use. Only `query` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchQuery {
    pub(crate) query: String,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) location: Option<String>,
}

impl SearchQuery {
    pub(crate) fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Reads `QUERY [--city CITY] [--state STATE] [--location LOCATION]`.
///
/// A flag value runs up to the next flag, so it may contain spaces.
pub(crate) fn parse_search_input(raw: &str) -> Result<SearchQuery, CallScriptError> {
    let padded = format!(" {}", raw);
    let mut parts = padded.split(" --");
    let mut search = SearchQuery::new(parts.next().unwrap_or_default().trim());
    for part in parts {
        let (flag, value) = part.split_once(' ').unwrap_or((part, ""));
        let value = Some(value.trim().to_string()).filter(|value| !value.is_empty());
        match flag {
            "city" => search.city = value,
            "state" => search.state = value,
            "location" => search.location = value,
            other => {
                return Err(CallScriptError::new(
                    "CLI_SEARCH_FLAG",
                    format!("Unknown search option: --{}", other),
                ))
            }
        }
    }
    Ok(search)
}

const BEENVERIFIED_TAIL: &str = "&title=&company=&industry=&level=&companySizeMin=1&companySizeMax=9&birthMonth=&birthYear=&deathMonth=&deathYear=&address=&isDeceased=false&location=&country=&advancedSearch=true&eventType=none&eventMonth=&eventYear=&source=personSearch,familySearch,obituarySearch,deathIndexSearch,contactSearch";

/// Builds the lookup URL, or `None` when the trimmed query is empty.
pub(crate) fn build_search_url(kind: SearchKind, search: &SearchQuery) -> Option<String> {
    let query = search.query.trim();
    if query.is_empty() {
        return None;
    }

    let url = match kind {
        SearchKind::Google => format!(
            "https://www.google.com/search?q={}",
            encode_uri_component(query)
        ),
        SearchKind::Maps => format!(
            "https://www.google.com/maps/search/{}",
            encode_uri_component(query)
        ),
        SearchKind::Beenverified => {
            let mut parts = query.split(' ');
            let first_name = parts.next().unwrap_or_default();
            let last_name = parts.collect::<Vec<_>>().join(" ");
            let city = search.city.as_deref().unwrap_or_default().trim();
            let state = search
                .state
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_uppercase();
            format!(
                "https://www.beenverified.com/rf/search/v2?age=0&city={}&fullname={}&fname={}&ln={}&mn=&state={}{}",
                encode_uri_component(city),
                encode_uri_component(query),
                encode_uri_component(first_name),
                encode_uri_component(&last_name),
                encode_uri_component(&state),
                BEENVERIFIED_TAIL
            )
        }
        SearchKind::Apollo => {
            let mut url = format!(
                "https://app.apollo.io/#/people?page=1&qKeywords={}",
                encode_uri_component(&format!("{} ", query))
            );
            if let Some(location) = search
                .location
                .as_deref()
                .filter(|location| !location.is_empty())
            {
                url.push_str("&personLocations[]=");
                url.push_str(&encode_uri_component(location));
            }
            url
        }
    };
    Some(url)
}

/// Percent-encodes UTF-8 bytes, leaving `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as is.
pub(crate) fn encode_uri_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
