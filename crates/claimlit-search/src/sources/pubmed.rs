//! PubMed E-utilities client.
//!
//! Endpoints used:
//!   esearch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!   efetch:  https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi
//!
//! An NCBI API key raises the rate limit; absence degrades to the shared
//! public tier.

use async_trait::async_trait;
use claimlit_common::netguard::GuardedClient as Client;
use claimlit_common::EvidenceCandidate;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use super::{format_authors, LiteratureProvider};

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

pub struct PubMedClient {
    client: Client,
    api_key: Option<String>,
}

impl PubMedClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new().expect("PubMed client build failed"),
            api_key,
        }
    }

    /// Search PubMed and return a list of PMIDs.
    #[instrument(skip(self))]
    async fn esearch(&self, query: &str, max: usize) -> anyhow::Result<Vec<String>> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max.to_string()),
            ("retmode", "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let resp: serde_json::Value = self
            .client
            .get(ESEARCH_URL)?
            .query(&params)
            .send()
            .await?
            .json()
            .await?;

        let ids = resp["esearchresult"]["idlist"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();

        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch PubMed XML for a list of PMIDs and parse into candidates.
    #[instrument(skip(self))]
    async fn efetch_abstracts(&self, pmids: &[String]) -> anyhow::Result<Vec<EvidenceCandidate>> {
        if pmids.is_empty() {
            return Ok(vec![]);
        }

        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("rettype", "abstract".to_string()),
            ("retmode", "xml".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let xml = self
            .client
            .get(EFETCH_URL)?
            .query(&params)
            .send()
            .await?
            .text()
            .await?;

        parse_pubmed_xml(&xml)
    }
}

#[async_trait]
impl LiteratureProvider for PubMedClient {
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<EvidenceCandidate>> {
        let pmids = self.esearch(query, limit).await?;
        self.efetch_abstracts(&pmids).await
    }

    fn name(&self) -> &'static str {
        "pubmed"
    }
}

/// Parse PubMed XML (efetch abstract mode) into a candidate list.
/// Handles the <PubmedArticleSet><PubmedArticle> structure.
fn parse_pubmed_xml(xml: &str) -> anyhow::Result<Vec<EvidenceCandidate>> {
    struct Partial {
        pmid: String,
        title: String,
        abstract_text: String,
        author_names: Vec<String>,
        journal: String,
        year: i32,
    }

    let mut candidates = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // State machine for XML parsing
    let mut current: Option<Partial> = None;
    let mut in_pmid = false;
    let mut in_title = false;
    let mut in_abstract = false;
    let mut in_author = false;
    let mut in_last_name = false;
    let mut in_fore_name = false;
    let mut in_journal = false;
    let mut in_pub_date = false;
    let mut in_year = false;
    let mut current_last = String::new();
    let mut current_fore = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    current = Some(Partial {
                        pmid: String::new(),
                        title: String::new(),
                        abstract_text: String::new(),
                        author_names: vec![],
                        journal: String::new(),
                        year: 0,
                    });
                }
                b"PMID" => in_pmid = true,
                b"ArticleTitle" => in_title = true,
                b"AbstractText" => in_abstract = true,
                b"Author" => {
                    in_author = true;
                    current_last.clear();
                    current_fore.clear();
                }
                b"LastName" => in_last_name = true,
                b"ForeName" => in_fore_name = true,
                b"Title" => in_journal = true,
                b"PubDate" => in_pub_date = true,
                b"Year" => in_year = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if let Some(ref mut p) = current {
                    if in_pmid && p.pmid.is_empty() {
                        p.pmid = text.clone();
                    }
                    if in_title {
                        p.title = text.clone();
                    }
                    if in_abstract {
                        if !p.abstract_text.is_empty() {
                            p.abstract_text.push(' ');
                        }
                        p.abstract_text.push_str(&text);
                    }
                    if in_last_name {
                        current_last = text.clone();
                    }
                    if in_fore_name {
                        current_fore = text.clone();
                    }
                    if in_journal {
                        p.journal = text.clone();
                    }
                    if in_pub_date && in_year && p.year == 0 {
                        p.year = text.parse().unwrap_or(0);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_title = false,
                b"AbstractText" => in_abstract = false,
                b"LastName" => in_last_name = false,
                b"ForeName" => in_fore_name = false,
                b"Title" => in_journal = false,
                b"PubDate" => in_pub_date = false,
                b"Year" => in_year = false,
                b"Author" => {
                    if in_author {
                        if let Some(ref mut p) = current {
                            let name = if current_fore.is_empty() {
                                current_last.clone()
                            } else {
                                format!("{} {}", current_fore, current_last)
                            };
                            if !name.is_empty() {
                                p.author_names.push(name);
                            }
                        }
                        in_author = false;
                    }
                }
                b"PubmedArticle" => {
                    if let Some(p) = current.take() {
                        if p.title.is_empty() {
                            warn!("Skipping PubMed record with empty title");
                        } else {
                            let mut c = EvidenceCandidate::bare(p.title);
                            c.authors = format_authors(&p.author_names);
                            c.journal = p.journal;
                            c.year = p.year;
                            c.summary = p.abstract_text;
                            if !p.pmid.is_empty() {
                                c.url = Some(format!("https://pubmed.ncbi.nlm.nih.gov/{}/", p.pmid));
                            }
                            candidates.push(c);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("XML parse error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimlit_common::EvidenceGrade;

    const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>34883514</PMID>
      <Article>
        <Journal>
          <Title>Sleep Medicine Reviews</Title>
          <JournalIssue><PubDate><Year>2021</Year></PubDate></JournalIssue>
        </Journal>
        <ArticleTitle>Oral magnesium supplementation for insomnia in older adults</ArticleTitle>
        <Abstract><AbstractText>A meta-analysis of randomized trials.</AbstractText></Abstract>
        <AuthorList>
          <Author><LastName>Mah</LastName><ForeName>Jasmine</ForeName></Author>
          <Author><LastName>Pitre</LastName><ForeName>Tyler</ForeName></Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_parse_minimal_pubmed_xml() {
        let papers = parse_pubmed_xml(SAMPLE_XML).unwrap();
        assert_eq!(papers.len(), 1);
        let p = &papers[0];
        assert_eq!(p.title, "Oral magnesium supplementation for insomnia in older adults");
        assert_eq!(p.authors, "Jasmine Mah et al.");
        assert_eq!(p.journal, "Sleep Medicine Reviews");
        assert_eq!(p.year, 2021);
        assert_eq!(p.summary, "A meta-analysis of randomized trials.");
        assert_eq!(p.url.as_deref(), Some("https://pubmed.ncbi.nlm.nih.gov/34883514/"));
    }

    #[test]
    fn test_unknown_fields_stay_at_defaults() {
        let papers = parse_pubmed_xml(SAMPLE_XML).unwrap();
        let p = &papers[0];
        assert_eq!(p.sample_size, 0);
        assert_eq!(p.effect_size, "Not specified");
        assert_eq!(p.dosage, "Not specified");
        assert_eq!(p.evidence_grade, EvidenceGrade::Moderate);
    }

    #[test]
    fn test_empty_title_skipped() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
            <PMID>1</PMID><Article></Article>
        </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
        let papers = parse_pubmed_xml(xml).unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_multi_segment_abstract_joined() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
          <PMID>2</PMID>
          <Article>
            <ArticleTitle>T</ArticleTitle>
            <Abstract>
              <AbstractText>Background part.</AbstractText>
              <AbstractText>Results part.</AbstractText>
            </Abstract>
          </Article>
        </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
        let papers = parse_pubmed_xml(xml).unwrap();
        assert_eq!(papers[0].summary, "Background part. Results part.");
    }
}
