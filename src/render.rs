use std::fmt::Write;

use crate::card::CardState;
use crate::dataset::Dataset;
use crate::omdb::{imdb_url, MovieDetail};
use crate::search::{SearchController, SearchPhase};

pub const CARD_FAILURE_MESSAGE: &str = "Failed to load movie data.";
pub const LOADING_MESSAGE: &str = "Finding amazing movies for you...";
pub const NO_RESULTS_MESSAGE: &str = "No movies found. Try searching for \"Jawan\"";

const STYLE: &str = r#"
body { margin: 0; background: #000; color: #fff; font-family: system-ui, sans-serif; }
main, header { max-width: 64rem; margin: 0 auto; padding: 2rem 1.5rem; }
h1 { text-align: center; font-size: 3.5rem; color: #c084fc; margin-bottom: .5rem; }
.tagline { text-align: center; color: #d1d5db; }
.search { position: relative; max-width: 40rem; margin: 2rem auto 0; }
.search form { display: flex; background: #111827; border-radius: 9999px; padding: .5rem; }
.search input { flex: 1; background: transparent; border: 0; color: #fff; font-size: 1.1rem; padding: .75rem 1.25rem; outline: none; }
.search button { border: 0; border-radius: 9999px; padding: .75rem 1.25rem; background: #7c3aed; color: #fff; cursor: pointer; }
.suggestions { position: absolute; width: 100%; list-style: none; margin: .5rem 0 0; padding: 0; background: #111827; border: 1px solid #374151; border-radius: .5rem; z-index: 20; }
.suggestions:empty { display: none; }
.suggestions a { display: block; padding: .5rem 1rem; color: #fff; text-decoration: none; }
.suggestions a:hover { background: #1f2937; }
.status { text-align: center; padding: 3rem 0; color: #9ca3af; font-size: 1.2rem; }
.features { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1.5rem; }
.feature { background: #1f2937; border-radius: 0.75rem; padding: 1.5rem; text-align: center; }
.feature h3 { margin: 0 0 0.5rem; color: #f9fafb; }
.feature p { margin: 0; color: #9ca3af; }
.spinner { display: inline-block; width: 3rem; height: 3rem; border: 4px solid #a855f7; border-top-color: transparent; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.card { background: #111827; border: 1px solid #374151; border-radius: .75rem; margin: .5rem 0; padding: 1.5rem; display: grid; grid-template-columns: 1fr 2fr; gap: 1.5rem; }
.card.loading { min-height: 300px; display: flex; justify-content: center; align-items: center; }
.card.failed { display: block; text-align: center; color: #ef4444; background: #1f2937; }
.poster { position: relative; }
.poster img { width: 100%; border-radius: .5rem; }
.badge { position: absolute; top: .75rem; right: .75rem; background: #facc15; color: #000; padding: .25rem .5rem; border-radius: 9999px; font-weight: bold; font-size: .875rem; }
.year { color: #9ca3af; font-size: 1.25rem; font-weight: normal; }
.plot { color: #d1d5db; line-height: 1.6; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; font-size: .875rem; color: #d1d5db; }
.fields span, .ratings span { font-weight: 600; color: #9ca3af; }
.ratings { font-size: .875rem; color: #9ca3af; }
.imdb { display: inline-block; margin-top: .75rem; background: #7c3aed; color: #fff; padding: .5rem 1rem; border-radius: .5rem; text-decoration: none; font-weight: 600; }
"#;

const SCRIPT: &str = r#"
const input = document.getElementById('search-input');
const list = document.getElementById('suggestions');
let latest = 0;
input.addEventListener('input', async () => {
  const ticket = ++latest;
  const res = await fetch('/suggest?q=' + encodeURIComponent(input.value));
  const items = res.ok ? await res.json() : [];
  if (ticket !== latest) return;
  list.replaceChildren(...items.map(({ key, title }) => {
    const li = document.createElement('li');
    const a = document.createElement('a');
    a.href = '/?pick=' + encodeURIComponent(key);
    a.textContent = title;
    li.appendChild(a);
    return li;
  }));
});
document.querySelectorAll('[data-movie-id]').forEach(async (slot) => {
  try {
    const res = await fetch('/cards/' + encodeURIComponent(slot.dataset.movieId));
    slot.outerHTML = await res.text();
  } catch (_) {
    slot.outerHTML = '<div class="card failed">Failed to load movie data.</div>';
  }
});
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn page(search: &SearchController<'_>, dataset: &Dataset) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>CineFlex</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<header>\n<h1>CineFlex</h1>\n");
    html.push_str("<p class=\"tagline\">Discover your next favorite movie with personalized recommendations</p>\n");
    html.push_str("<div class=\"search\">\n<form action=\"/\" method=\"get\" autocomplete=\"off\">\n");
    let _ = writeln!(
        html,
        "<input id=\"search-input\" type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Search for movies e.g Jawan\">",
        escape(search.input())
    );
    html.push_str("<button type=\"submit\" aria-label=\"Search\">Search</button>\n</form>\n");
    html.push_str(&suggestions(search.suggestions(), dataset));
    html.push_str("</div>\n</header>\n");
    html.push_str(&results(search.phase()));
    html.push_str("<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

pub fn suggestions(keys: &[String], dataset: &Dataset) -> String {
    let mut html = String::from("<ul id=\"suggestions\" class=\"suggestions\">");
    for key in keys {
        let Some(entry) = dataset.get(key) else {
            continue;
        };
        let _ = write!(
            html,
            "<li><a href=\"/?pick={}\">{}</a></li>",
            urlencoding::encode(key),
            escape(&entry.movie.title)
        );
    }
    html.push_str("</ul>\n");
    html
}

pub fn results(phase: &SearchPhase) -> String {
    match phase {
        SearchPhase::Idle => welcome(),
        SearchPhase::Loading => format!(
            "<main>\n<div class=\"status\"><div class=\"spinner\"></div><p>{LOADING_MESSAGE}</p></div>\n</main>\n"
        ),
        SearchPhase::Empty => format!(
            "<main>\n<div class=\"status\"><p>{}</p></div>\n</main>\n",
            escape(NO_RESULTS_MESSAGE)
        ),
        SearchPhase::Results(movies) => {
            let mut html = String::from("<main>\n<h2>Movies &amp; Recommendations</h2>\n");
            for movie in movies {
                html.push_str(&card_placeholder(&movie.identifier));
            }
            html.push_str("</main>\n");
            html
        }
    }
}

const FEATURES: [(&str, &str); 3] = [
    (
        "Smart Search",
        "Find movies instantly with our intelligent search system",
    ),
    (
        "Expert Ratings",
        "Get IMDB ratings and detailed movie information",
    ),
    ("Recommendations", "Discover similar movies you'll love"),
];

fn welcome() -> String {
    let mut html = String::from(
        "<main>\n<div class=\"status\">\n<h2>Welcome to Your Personal Cinema</h2>\n\
         <p>Search for any movie and discover personalized recommendations tailored just for you.</p>\n\
         </div>\n<div class=\"features\">\n",
    );
    for (name, blurb) in FEATURES {
        html.push_str(&format!(
            "<div class=\"feature\"><h3>{name}</h3><p>{blurb}</p></div>\n"
        ));
    }
    html.push_str("</div>\n</main>\n");
    html
}

pub fn card_placeholder(identifier: &str) -> String {
    format!(
        "<div class=\"card loading\" data-movie-id=\"{}\"><div class=\"spinner\"></div></div>\n",
        escape(identifier)
    )
}

pub fn card(identifier: &str, state: &CardState) -> String {
    match state {
        CardState::Loading => card_placeholder(identifier),
        CardState::Failed(_) => {
            format!("<div class=\"card failed\">{CARD_FAILURE_MESSAGE}</div>\n")
        }
        CardState::Ready(detail) => card_content(identifier, detail),
    }
}

fn card_content(identifier: &str, movie: &MovieDetail) -> String {
    let mut html = String::from("<article class=\"card\">\n<div class=\"poster\">");
    let _ = write!(
        html,
        "<img src=\"{}\" alt=\"{}\">",
        escape(&movie.poster),
        escape(&movie.title)
    );
    if let Some(rating) = movie.rating_badge() {
        let _ = write!(html, "<div class=\"badge\">&#11088; {}</div>", escape(rating));
    }
    html.push_str("</div>\n<div class=\"details\">\n");
    let _ = writeln!(
        html,
        "<h2>{} <span class=\"year\">({})</span></h2>",
        escape(&movie.title),
        escape(&movie.year)
    );
    let _ = writeln!(html, "<p class=\"plot\">{}</p>", escape(&movie.plot));

    html.push_str("<div class=\"fields\">\n");
    let fields = [
        ("Genre", &movie.genre),
        ("Runtime", &movie.runtime),
        ("Released", &movie.released),
        ("Director", &movie.director),
        ("Writer", &movie.writer),
        ("Actors", &movie.actors),
        ("Language", &movie.language),
        ("Country", &movie.country),
        ("Box Office", &movie.box_office),
        ("Awards", &movie.awards),
    ];
    for (label, value) in fields {
        let _ = writeln!(html, "<div><span>{label}:</span> {}</div>", escape(value));
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"ratings\">\n<h3>Ratings:</h3>\n<ul>\n");
    for rating in &movie.ratings {
        let _ = writeln!(
            html,
            "<li><span>{}:</span> {}</li>",
            escape(&rating.source),
            escape(&rating.value)
        );
    }
    html.push_str("</ul>\n</div>\n");

    let _ = writeln!(
        html,
        "<a class=\"imdb\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">View on IMDB</a>",
        escape(&imdb_url(identifier))
    );
    html.push_str("</div>\n</article>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardFailure;
    use crate::omdb::Rating;

    fn inception() -> MovieDetail {
        MovieDetail {
            title: "Inception".to_string(),
            year: "2010".to_string(),
            genre: "Action, Sci-Fi".to_string(),
            plot: "Dreams <within> dreams.".to_string(),
            poster: "https://img.example/inception.jpg".to_string(),
            box_office: "$292,587,330".to_string(),
            imdb_rating: "8.8".to_string(),
            ratings: vec![
                Rating {
                    source: "Internet Movie Database".to_string(),
                    value: "8.8/10".to_string(),
                },
                Rating {
                    source: "Rotten Tomatoes".to_string(),
                    value: "87%".to_string(),
                },
            ],
            response: "True".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn ready_card_shows_fields_ratings_and_link() {
        let html = card("tt1375666", &CardState::Ready(Box::new(inception())));
        assert!(html.contains("Inception <span class=\"year\">(2010)</span>"));
        assert!(html.contains("Dreams &lt;within&gt; dreams."));
        assert!(html.contains("<span>Box Office:</span> $292,587,330"));
        assert!(html.contains("&#11088; 8.8"));
        assert!(html.contains("https://www.imdb.com/title/tt1375666"));
        let imdb = html.find("Internet Movie Database").unwrap();
        let rt = html.find("Rotten Tomatoes").unwrap();
        assert!(imdb < rt);
    }

    #[test]
    fn badge_omitted_when_rating_not_available() {
        let mut movie = inception();
        movie.imdb_rating = "N/A".to_string();
        let html = card("tt1375666", &CardState::Ready(Box::new(movie)));
        assert!(!html.contains("class=\"badge\""));
    }

    #[test]
    fn welcome_lists_feature_tiles() {
        let html = welcome();
        for (name, blurb) in FEATURES {
            assert!(html.contains(&format!("<h3>{name}</h3>")));
            assert!(html.contains(blurb));
        }
        assert!(html.find("Smart Search").unwrap() < html.find("Recommendations</h3>").unwrap());
    }

    #[test]
    fn failed_card_shows_only_fixed_message() {
        let html = card(
            "tt0000000",
            &CardState::Failed(CardFailure::Rejected("Incorrect IMDb ID.".to_string())),
        );
        assert!(html.contains(CARD_FAILURE_MESSAGE));
        assert!(!html.contains("Incorrect IMDb ID."));
        assert!(!html.contains("View on IMDB"));
    }

    #[test]
    fn loading_card_is_a_spinner_slot() {
        let html = card("tt1", &CardState::Loading);
        assert!(html.contains("data-movie-id=\"tt1\""));
        assert!(html.contains("spinner"));
    }

    #[test]
    fn page_renders_each_phase() {
        let data = Dataset::bundled().unwrap();
        let mut search = SearchController::new(&data);
        assert!(page(&search, &data).contains("Welcome to Your Personal Cinema"));

        search.on_input("nothing like this");
        search.submit();
        assert!(page(&search, &data).contains("No movies found. Try searching for &quot;Jawan&quot;"));

        search.on_input("JAWAN");
        search.submit();
        let html = page(&search, &data);
        assert!(html.contains("value=\"Jawan\""));
        assert!(html.contains("data-movie-id=\"tt12844910\""));
        assert!(html.contains("data-movie-id=\"tt7838252\""));

        assert!(results(&SearchPhase::Loading).contains(LOADING_MESSAGE));
    }

    #[test]
    fn suggestion_links_pick_by_key() {
        let data = Dataset::bundled().unwrap();
        let html = suggestions(&["kgf-chapter-1".to_string(), "missing".to_string()], &data);
        assert!(html.contains("<a href=\"/?pick=kgf-chapter-1\">K.G.F: Chapter 1</a>"));
        assert_eq!(html.matches("<li>").count(), 1);
    }
}
