//! CMCI request envelopes.
//!
//! A request body is one of two fixed shapes: a `create` verb carrying a CSD
//! parameter and an ordered attribute list, or an `action` verb naming a CSD
//! action (`CSDINSTALL`, `NEWCOPY`). Envelopes are built fresh per call, used
//! once, and rendered to XML for the transport.

/// Attribute list entry: CMCI attribute key (already lower-cased) and value.
pub type Attribute = (&'static str, String);

/// A CMCI request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEnvelope {
    /// `<request><create><parameter name="CSD"/><attributes .../></create></request>`
    ///
    /// The parameter name is always the literal `CSD`; attributes hold exactly
    /// the fields relevant to the resource kind, in mapping-table order.
    Create { attributes: Vec<Attribute> },

    /// `<request><action name="..."/></request>`
    Action { name: &'static str },
}

/// CSD action name for installing a definition into a region.
pub const ACTION_CSDINSTALL: &str = "CSDINSTALL";

/// CSD action name for phasing in a new copy of an installed program.
pub const ACTION_NEWCOPY: &str = "NEWCOPY";

impl RequestEnvelope {
    /// Create-verb envelope with the fixed `CSD` parameter.
    pub fn create(attributes: Vec<Attribute>) -> Self {
        RequestEnvelope::Create { attributes }
    }

    /// Action-verb envelope.
    pub fn action(name: &'static str) -> Self {
        RequestEnvelope::Action { name }
    }

    /// Render the envelope to the XML body CMCI expects.
    ///
    /// Output is deterministic: identical envelopes render byte-identically.
    pub fn to_xml(&self) -> String {
        match self {
            RequestEnvelope::Create { attributes } => {
                let mut attrs = String::new();
                for (key, value) in attributes {
                    attrs.push_str(&format!(" {}=\"{}\"", key, xml_escape(value)));
                }
                format!(
                    "<request><create><parameter name=\"CSD\"></parameter><attributes{}></attributes></create></request>",
                    attrs
                )
            }
            RequestEnvelope::Action { name } => {
                format!("<request><action name=\"{}\"></action></request>", name)
            }
        }
    }

    /// Attribute list for create envelopes; empty for actions.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            RequestEnvelope::Create { attributes } => attributes,
            RequestEnvelope::Action { .. } => &[],
        }
    }
}

/// Escape special XML characters in attribute values.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_envelope_renders_csd_parameter() {
        let envelope = RequestEnvelope::create(vec![
            ("name", "PGM1".to_string()),
            ("csdgroup", "GRP1".to_string()),
        ]);
        assert_eq!(
            envelope.to_xml(),
            "<request><create><parameter name=\"CSD\"></parameter>\
             <attributes name=\"PGM1\" csdgroup=\"GRP1\"></attributes></create></request>"
        );
    }

    #[test]
    fn test_action_envelope() {
        let envelope = RequestEnvelope::action(ACTION_CSDINSTALL);
        assert_eq!(
            envelope.to_xml(),
            "<request><action name=\"CSDINSTALL\"></action></request>"
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let envelope = RequestEnvelope::create(vec![
            ("name", "DFN1234".to_string()),
            ("csdgroup", "GRP1".to_string()),
            ("path", "a/b.html".to_string()),
        ]);
        assert_eq!(envelope.to_xml(), envelope.clone().to_xml());
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let envelope =
            RequestEnvelope::create(vec![("description", "a < b & \"c\"".to_string())]);
        let xml = envelope.to_xml();
        assert!(xml.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(!xml.contains("a < b"));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("plain"), "plain");
        assert_eq!(xml_escape("<&>'\""), "&lt;&amp;&gt;&apos;&quot;");
    }
}
