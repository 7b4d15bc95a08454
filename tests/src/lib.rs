#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use rand::Rng;
    use zkfact_lib::*;

    const WELL_FORMED: &str =
        "A 1 2\nA_p 3 4\nB 5 6 7 8\nB_p 9 10\nC 11 12\nC_p 13 14\nH 15 16\nK 17 18";

    /// The well-formed proof with the line for `label` removed.
    fn without(label: Label) -> String {
        WELL_FORMED
            .lines()
            .filter(|line| line.split(' ').next() != Some(label.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a proof the way a ZoKrates-style CLI prints it.
    fn render_hex(args: &ProofArguments) -> String {
        let point = |c: &Coordinate| format!("0x{:x}, 0x{:x}", c.0, c.1);
        format!(
            "Proof:\n\
             A = [{}]\n\
             A_p = [{}]\n\
             B = [[{}], [{}]]\n\
             B_p = [{}]\n\
             C = [{}]\n\
             C_p = [{}]\n\
             H = [{}]\n\
             K = [{}]\n",
            point(&args.a),
            point(&args.a_p),
            point(&args.b1),
            point(&args.b2),
            point(&args.b_p),
            point(&args.c),
            point(&args.c_p),
            point(&args.h),
            point(&args.k),
        )
    }

    #[test]
    fn test_decode_example_proof() {
        let args = decode(WELL_FORMED).unwrap();
        assert_eq!(args.a, Coordinate::from([1, 2]));
        assert_eq!(args.a_p, Coordinate::from([3, 4]));
        assert_eq!(args.b1, Coordinate::from([5, 6]));
        assert_eq!(args.b2, Coordinate::from([7, 8]));
        assert_eq!(args.b_p, Coordinate::from([9, 10]));
        assert_eq!(args.c, Coordinate::from([11, 12]));
        assert_eq!(args.c_p, Coordinate::from([13, 14]));
        assert_eq!(args.h, Coordinate::from([15, 16]));
        assert_eq!(args.k, Coordinate::from([17, 18]));
    }

    #[test]
    fn test_call_order_matches_withdraw_signature() {
        let args = decode(WELL_FORMED).unwrap();
        let flat: Vec<U256> = args
            .to_call_order()
            .into_iter()
            .flat_map(Coordinate::to_array)
            .collect();
        let expected: Vec<U256> = (1u64..=18).map(U256::from).collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_line_order_does_not_matter() {
        let mut lines: Vec<&str> = WELL_FORMED.lines().collect();
        lines.reverse();
        let shuffled = lines.join("\n");
        assert_eq!(decode(&shuffled).unwrap(), decode(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_max_field_values_survive() {
        let max = U256::MAX.to_string();
        let near = (U256::MAX - U256::from(1u64)).to_string();
        let text = WELL_FORMED.replace("K 17 18", &format!("K {max} {near}"));
        let args = decode(&text).unwrap();
        assert_eq!(args.k, Coordinate::new(U256::MAX, U256::MAX - U256::from(1u64)));
    }

    #[test]
    fn test_value_above_uint256_rejected() {
        // 2^256
        let overflow =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        let text = WELL_FORMED.replace("H 15 16", &format!("H 15 {overflow}"));
        let err = decode(&text).unwrap_err();
        assert_eq!(
            err,
            MalformedProof::InvalidNumber {
                label: Label::H,
                token: overflow.to_string()
            }
        );
    }

    #[test]
    fn test_random_values_roundtrip_through_hex_rendering() {
        let mut rng = rand::thread_rng();
        let mut coordinate = || {
            let x: [u8; 32] = rng.gen();
            let y: [u8; 32] = rng.gen();
            Coordinate::new(U256::from_be_bytes(x), U256::from_be_bytes(y))
        };
        let original = ProofArguments {
            a: coordinate(),
            a_p: coordinate(),
            b1: coordinate(),
            b2: coordinate(),
            b_p: coordinate(),
            c: coordinate(),
            c_p: coordinate(),
            h: coordinate(),
            k: coordinate(),
        };

        let decoded = decode(&render_hex(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_each_missing_label_is_named() {
        for label in Label::ALL {
            let err = decode(&without(label)).unwrap_err();
            assert_eq!(err, MalformedProof::Missing(label), "dropping {label}");
            assert_eq!(err.label(), label);
        }
    }

    #[test]
    fn test_empty_input_reports_first_label() {
        assert_eq!(decode("").unwrap_err(), MalformedProof::Missing(Label::A));
        assert_eq!(
            decode("\n\n  \n").unwrap_err(),
            MalformedProof::Missing(Label::A)
        );
    }

    #[test]
    fn test_short_b_line_rejected() {
        let text = WELL_FORMED.replace("B 5 6 7 8", "B 5 6 7");
        assert_eq!(
            decode(&text).unwrap_err(),
            MalformedProof::Arity {
                label: Label::B,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_extra_numbers_rejected() {
        let text = WELL_FORMED.replace("C 11 12", "C 11 12 13");
        let err = decode(&text).unwrap_err();
        assert_eq!(err.label(), Label::C);
        assert!(matches!(err, MalformedProof::Arity { found: 3, .. }));
    }

    #[test]
    fn test_non_numeric_token_rejected() {
        let text = WELL_FORMED.replace("A_p 3 4", "A_p 3 four");
        assert_eq!(
            decode(&text).unwrap_err(),
            MalformedProof::InvalidNumber {
                label: Label::APrime,
                token: "four".to_string()
            }
        );
    }

    #[test]
    fn test_negative_sign_is_a_separator() {
        // `-` is a non-word character, so "-3" splits to "3" and the sign is lost
        // rather than producing a negative number.
        let text = WELL_FORMED.replace("A_p 3 4", "A_p -3 4");
        assert_eq!(decode(&text).unwrap().a_p, Coordinate::from([3, 4]));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let text = format!("{WELL_FORMED}\nK 19 20");
        assert_eq!(
            decode(&text).unwrap_err(),
            MalformedProof::Duplicate(Label::K)
        );
    }

    #[test]
    fn test_unrecognised_lines_ignored() {
        let text = format!("Proof:\n{WELL_FORMED}\nvk_hash 99 100\n# generated\ninput 1");
        assert_eq!(decode(&text).unwrap(), decode(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_crlf_and_padding_tolerated() {
        let text = WELL_FORMED
            .lines()
            .map(|line| format!("   {line};\t"))
            .collect::<Vec<_>>()
            .join("\r\n");
        assert_eq!(decode(&text).unwrap(), decode(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let first = decode(WELL_FORMED).unwrap();
        let second = decode(WELL_FORMED).unwrap();
        assert_eq!(first, second);
        assert_eq!(WELL_FORMED.parse::<ProofArguments>().unwrap(), first);
    }

    #[test]
    fn test_fixture_proof_decodes() {
        let text = include_str!("../../fixtures/proof.txt");
        let args = decode(text).unwrap();
        assert_eq!(
            args.b2.0,
            U256::from_str_radix(
                "2031425364758697a8b9cadbecfd0e1f2031425364758697a8b9cadbecfd0e1",
                16
            )
            .unwrap()
        );
        assert_ne!(args.b1, args.b2);
    }

    #[test]
    fn test_arguments_serialize_json() -> anyhow::Result<()> {
        let args = decode(WELL_FORMED)?;
        let json = serde_json::to_string_pretty(&args)?;
        let parsed: ProofArguments = serde_json::from_str(&json)?;
        assert_eq!(parsed, args);

        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert!(value["b2"][1].is_string());
        Ok(())
    }
}
