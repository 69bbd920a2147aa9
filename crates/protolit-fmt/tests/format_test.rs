use pretty_assertions::assert_eq;
use protolit_fmt::{
    Canonicalize, FormatConfig, GoLiteralFormatter, IndentStyle, NewlineStyle, canonicalize,
};

#[test]
fn test_nested_messages_align_like_gofmt() {
    let raw = "&hotstuff.Proposal{
Block: &hotstuff.Block{
Parent: []byte{1, 2, 3},
QC: &hotstuff.QuorumCert{
},
View: 1,
Command: []byte{4, 5, 6},
Proposer: 2,
},
AggQC: &hotstuff.AggQC{
},
}
";
    let expected = "&hotstuff.Proposal{
\tBlock: &hotstuff.Block{
\t\tParent:   []byte{1, 2, 3},
\t\tQC:       &hotstuff.QuorumCert{},
\t\tView:     1,
\t\tCommand:  []byte{4, 5, 6},
\t\tProposer: 2,
\t},
\tAggQC: &hotstuff.AggQC{},
}
";
    assert_eq!(canonicalize(raw).unwrap(), expected);
}

#[test]
fn test_map_and_list_elements() {
    let raw = "&hotstuff.AggQC{
QCs: map[uint32]*hotstuff.QuorumCert{
1: {
},
2: {
},
},
Sig: &hotstuff.QuorumSignature{
},
View: 3,
}
";
    let expected = "&hotstuff.AggQC{
\tQCs: map[uint32]*hotstuff.QuorumCert{
\t\t1: {},
\t\t2: {},
\t},
\tSig:  &hotstuff.QuorumSignature{},
\tView: 3,
}
";
    assert_eq!(canonicalize(raw).unwrap(), expected);
}

#[test]
fn test_elided_list_elements() {
    let raw = "[]*hotstuff.ECDSASignature{
{
Signer: 1,
R: []byte{1, 2, 3},
S: []byte{4, 5, 6},
},
}";
    let expected = "[]*hotstuff.ECDSASignature{
\t{
\t\tSigner: 1,
\t\tR:      []byte{1, 2, 3},
\t\tS:      []byte{4, 5, 6},
\t},
}
";
    assert_eq!(canonicalize(raw).unwrap(), expected);
}

#[test]
fn test_idempotent() {
    let inputs = [
        "&p.T{\nA: 1,\nBB: \"x\", // note\nC: []string{\"a\",\n\"b\"},\n}",
        "map[string]int32{\"k\": 1, \"long key\": 2}",
        "&p.T{\n/* leading */ A: float32(math.Inf(1)),\nB: -0x1P+2,\n}\n\n",
        "[]p.E{p.E_ONE, 7}",
    ];
    for input in inputs {
        let once = canonicalize(input).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice, "input: {input:?}");
        assert!(once.ends_with("}\n") && !once.ends_with("\n\n"));
    }
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(
        canonicalize("&p.T{ // head\nA: 1, /* tail */\n}").unwrap(),
        "&p.T{\n\tA: 1,\n}\n"
    );
}

#[test]
fn test_rejects_missing_comma() {
    let err = canonicalize("&p.T{\nA: 1\n}").unwrap_err();
    assert_eq!(err.message, "missing ',' before newline in composite literal");
    assert_eq!(err.line, 2);
}

#[test]
fn test_rejects_unbalanced_braces() {
    assert!(canonicalize("&p.T{\nA: 1,\n").is_err());
    assert!(canonicalize("&p.T{}}").is_err());
}

#[test]
fn test_rejects_bad_escape() {
    let err = canonicalize("&p.T{S: \"\\z\"}").unwrap_err();
    assert_eq!(err.to_string(), "1:10: unknown escape sequence");
}

#[test]
fn test_rejects_trailing_tokens() {
    let err = canonicalize("&p.T{}\n&p.T{}").unwrap_err();
    assert_eq!(err.message, "expected EOF, found '&'");
}

#[test]
fn test_spaces_config() {
    let formatter = GoLiteralFormatter::new(
        FormatConfig::new()
            .with_indent(IndentStyle::Spaces(2))
            .with_newline(NewlineStyle::Crlf),
    );
    assert_eq!(
        formatter.canonicalize("T{\nA: 1,\n}").unwrap(),
        "T{\r\n  A: 1,\r\n}\r\n"
    );
}
