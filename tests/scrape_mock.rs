use httpmock::Method::GET;
use httpmock::MockServer;

use boe_scrape::aggregate::assemble;
use boe_scrape::config::Config;
use boe_scrape::fetch::HttpSource;
use boe_scrape::navigate::gather_races;
use boe_scrape::report::write_json;

fn race_list_page() -> String {
    // Table index 2 is the race grid; the last four rows are footer.
    concat!(
        "<html><body>",
        "<table><tr><td>nav</td></tr></table>",
        "<table><tr><td>banner</td></tr></table>",
        "<table>",
        "<tr><td>1</td><td>\u{a0}</td><td>Mayor Citywide</td><td>DEM</td>",
        "<td><a href=\"CD1ADI0.html\">AD Details</a></td></tr>",
        "<tr><td>legend</td></tr>",
        "<tr><td>legend</td></tr>",
        "<tr><td>updated</td></tr>",
        "<tr><td>updated</td></tr>",
        "</table></body></html>"
    )
    .to_string()
}

fn detail_page() -> String {
    concat!(
        "<html><body>",
        "<table><tr><td>nav</td></tr></table>",
        "<table><tr><td>banner</td></tr></table>",
        "<table><tr><td>totals grid</td></tr></table>",
        "<p><a href=\"AD23.html\">AD 23</a> <a href=\"AD24.html\">AD 24</a></p>",
        "</body></html>"
    )
    .to_string()
}

fn summary_page() -> String {
    concat!(
        "<html><body>",
        "<table><tr><td>nav</td></tr></table>",
        "<table><tr><td>banner</td></tr></table>",
        "<table>",
        "<tr><th>\u{a0}</th><th>Counted</th><th>EDs</th><th>Name</th><th>Party</th><th>Votes</th><th>Percent</th></tr>",
        "<tr><td>x</td><td>11</td><td>12</td><td>Jane Roe</td><td></td><td>300</td><td>60%</td></tr>",
        "<tr><td>x</td><td>11</td><td>12</td><td>Jane Roe</td><td>DEM</td><td>280</td><td>56%</td></tr>",
        "<tr><td>x</td><td>11</td><td>12</td><td>Jane Roe</td><td>WFP</td><td>20</td><td>4%</td></tr>",
        "<tr><td>x</td><td>11</td><td>12</td><td>John Doe</td><td></td><td>200</td><td>40%</td></tr>",
        "<tr><td>x</td><td>11</td><td>12</td><td>John Doe</td><td>REP</td><td>200</td><td>40%</td></tr>",
        "<tr><td><label>91.67%</label></td></tr>",
        "</table>",
        "<label>Copyright NYC BOE</label>",
        "</body></html>"
    )
    .to_string()
}

fn ad_page(ed_rows: &str) -> String {
    format!(
        "<html><body>\
         <table><tr><td>nav</td></tr></table>\
         <table><tr><td>banner</td></tr></table>\
         <table>\
         <tr><td>\u{a0}</td><td>\u{a0}</td><td>Jane Roe</td><td>John Doe</td><td>Jane Roe</td></tr>\
         <tr><td>Recorded</td></tr>\
         {ed_rows}\
         <tr><td>Total</td><td></td><td>0</td><td>0</td><td>0</td></tr>\
         </table></body></html>"
    )
}

fn mock_config(server: &MockServer) -> Config {
    Config {
        base_url: server.url("/"),
        election: Some(1),
        ..Default::default()
    }
}

#[test]
fn full_scrape_aggregates_metadata_and_districts() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(race_list_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1AD0.html");
        then.status(200).body(detail_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1ADI0.html");
        then.status(200).body(summary_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD23.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 1</td><td>100%</td><td>10</td><td>5</td><td>2</td></tr>\
             <tr><td>ED 2</td><td>50%</td><td>-</td><td>3</td><td>1</td></tr>",
        ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD24.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 7</td><td>100%</td><td>4</td><td>4</td><td>4</td></tr>",
        ));
    });

    let config = mock_config(&server);
    let source = HttpSource::new(&config).expect("client should build");

    let races = gather_races(&source, &config).expect("navigation should succeed");
    assert_eq!(races.len(), 1);
    let race = &races["Mayor Citywide DEM"];
    assert!(!race.district_race);
    assert!(race.metadata_url.ends_with("/CD1ADI0.html"));

    let result = assemble(&source, race, &config).expect("aggregation should succeed");

    // Summary metadata, fusion parties included.
    assert_eq!(result.candidates, vec!["Jane Roe", "John Doe"]);
    assert_eq!(result.total.candidate_total_votes["Jane Roe"], 300);
    assert_eq!(
        result.total.candidate_parties["Jane Roe"],
        vec!["DEM".to_string(), "WFP".to_string()]
    );
    assert_eq!(result.total.total_percentage_reporting, "91.67%");

    // Detail rows: fusion columns merged, dash counted as zero, codes padded.
    assert_eq!(
        result.detailed.keys().cloned().collect::<Vec<_>>(),
        vec![23, 24]
    );
    let ad23 = &result.detailed[&23];
    assert_eq!(ad23["001"].votes["Jane Roe"], 12);
    assert_eq!(ad23["001"].votes["John Doe"], 5);
    assert_eq!(ad23["002"].votes["Jane Roe"], 1);
    assert_eq!(ad23["002"].reporting, "50%");
    assert_eq!(result.detailed[&24]["007"].votes["Jane Roe"], 8);
}

#[test]
fn pooled_fetch_matches_the_sequential_result() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(race_list_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1AD0.html");
        then.status(200).body(detail_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1ADI0.html");
        then.status(200).body(summary_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD23.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 1</td><td>100%</td><td>10</td><td>5</td><td>2</td></tr>",
        ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD24.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 7</td><td>100%</td><td>4</td><td>4</td><td>4</td></tr>",
        ));
    });

    let sequential = mock_config(&server);
    let pooled = Config {
        fetch_threads: 3,
        ..mock_config(&server)
    };
    let source = HttpSource::new(&sequential).expect("client should build");

    let races = gather_races(&source, &sequential).expect("navigation should succeed");
    let race = &races["Mayor Citywide DEM"];

    let a = assemble(&source, race, &sequential).expect("sequential aggregation");
    let b = assemble(&source, race, &pooled).expect("pooled aggregation");
    assert_eq!(a, b);
    assert_eq!(b.detailed[&23]["001"].votes["Jane Roe"], 12);
}

#[test]
fn repeated_runs_serialize_byte_identically() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(race_list_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1AD0.html");
        then.status(200).body(detail_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1ADI0.html");
        then.status(200).body(summary_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD23.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 1</td><td>100%</td><td>10</td><td>5</td><td>2</td></tr>",
        ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD24.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 7</td><td>100%</td><td>4</td><td>4</td><td>4</td></tr>",
        ));
    });

    let config = mock_config(&server);
    let source = HttpSource::new(&config).expect("client should build");
    let races = gather_races(&source, &config).unwrap();
    let race = races.values().next().unwrap();

    let mut first = Vec::new();
    let mut second = Vec::new();
    write_json(&assemble(&source, race, &config).unwrap(), &mut first).unwrap();
    write_json(&assemble(&source, race, &config).unwrap(), &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_results_grid_fails_the_race() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(race_list_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1AD0.html");
        then.status(200).body(detail_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/CD1ADI0.html");
        then.status(200).body(summary_page());
    });
    // AD 23 serves a page whose layout has changed under us.
    server.mock(|when, then| {
        when.method(GET).path("/AD23.html");
        then.status(200)
            .body("<html><body><table></table></body></html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/AD24.html");
        then.status(200).body(ad_page(
            "<tr><td>ED 7</td><td>100%</td><td>4</td><td>4</td><td>4</td></tr>",
        ));
    });

    let config = mock_config(&server);
    let source = HttpSource::new(&config).expect("client should build");
    let races = gather_races(&source, &config).unwrap();
    let race = races.values().next().unwrap();

    let err = assemble(&source, race, &config).unwrap_err();
    assert!(err.to_string().contains("structure mismatch"));
}

#[test]
fn network_failure_propagates_immediately() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(500);
    });

    let config = mock_config(&server);
    let source = HttpSource::new(&config).expect("client should build");
    let err = gather_races(&source, &config).unwrap_err();
    assert!(err.to_string().contains("unexpected HTTP status 500"));
}
