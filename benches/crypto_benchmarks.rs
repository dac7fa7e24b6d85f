use criterion::{black_box, criterion_group, criterion_main, Criterion};
use attest_engine::{
    recover_public_key, sign_with_ethereum, AttestationType, AttestedObject, AttestationCrypto, AttestorConfig,
    AttestorContext, Cheque, ChequeDecoder, CommitmentSecret, Encodable, PedersenCrypto, PrivateKey,
    SignedIdentifierAttestation, Validity,
};
use time::OffsetDateTime;

fn bench_sign(c: &mut Criterion) {
    let key = PrivateKey::from_bytes(&[0x11; 32]).unwrap();
    let message = [0u8; 256];

    c.bench_function("sign_with_ethereum", |b| {
        b.iter(|| {
            let _ = sign_with_ethereum(black_box(&message), black_box(1), &key);
        });
    });
}

fn bench_recover(c: &mut Criterion) {
    let key = PrivateKey::from_bytes(&[0x11; 32]).unwrap();
    let message = [0u8; 256];
    let signature = sign_with_ethereum(&message, 0, &key).unwrap();

    c.bench_function("recover_public_key", |b| {
        b.iter(|| {
            let _ = recover_public_key(black_box(&message), black_box(signature.as_bytes()));
        });
    });
}

fn bench_attestation_decode(c: &mut Criterion) {
    let context = AttestorContext::new(PrivateKey::from_bytes(&[0x12; 32]).unwrap(), AttestorConfig::default()).unwrap();
    let subject = PrivateKey::from_bytes(&[0x13; 32]).unwrap().public_key();
    let der = context.issue_hidden(&subject, &[7u8; 65]).unwrap().der_encoding();

    c.bench_function("signed_attestation_decode", |b| {
        b.iter(|| {
            let _ = SignedIdentifierAttestation::decode(black_box(&der), context.public_key());
        });
    });
}

fn bench_pedersen(c: &mut Criterion) {
    let crypto = PedersenCrypto::new();
    let s1 = CommitmentSecret::from_bytes(&[0x21; 32]).unwrap();
    let s2 = CommitmentSecret::from_bytes(&[0x22; 32]).unwrap();
    let c1 = crypto.make_commitment("bob@example.com", AttestationType::Email, &s1);
    let c2 = crypto.make_commitment("bob@example.com", AttestationType::Email, &s2);
    let proof = crypto.compute_equality_proof(&c1, &c2, &s1, &s2, &[]).unwrap();

    c.bench_function("pedersen_commit", |b| {
        b.iter(|| {
            let _ = crypto.make_commitment(black_box("bob@example.com"), AttestationType::Email, &s1);
        });
    });
    c.bench_function("equality_proof_verify", |b| {
        b.iter(|| {
            let _ = crypto.verify_equality_proof(black_box(&c1), black_box(&c2), &proof);
        });
    });
}

fn bench_redemption_decode(c: &mut Criterion) {
    let crypto = PedersenCrypto::new();
    let context = AttestorContext::new(PrivateKey::from_bytes(&[0x31; 32]).unwrap(), AttestorConfig::default()).unwrap();
    let holder = PrivateKey::from_bytes(&[0x32; 32]).unwrap();
    let sender = PrivateKey::from_bytes(&[0x33; 32]).unwrap();
    let s1 = CommitmentSecret::from_bytes(&[0x34; 32]).unwrap();
    let s2 = CommitmentSecret::from_bytes(&[0x35; 32]).unwrap();
    let attestation = context
        .issue_hidden_for("bob@example.com", AttestationType::Email, &s1, &holder.public_key(), &crypto)
        .unwrap();
    let validity = Validity::unlimited_from(OffsetDateTime::now_utc()).unwrap();
    let cheque = Cheque::new("bob@example.com", AttestationType::Email, 10, validity, &sender, &s2, &crypto).unwrap();
    let redemption = AttestedObject::new_signed(cheque, attestation, &holder, 0, &s1, &s2, crypto.clone()).unwrap();
    let der = redemption.der_encoding_with_signature().to_vec();

    c.bench_function("attested_cheque_decode", |b| {
        b.iter(|| {
            let _ = AttestedObject::decode(black_box(&der), &ChequeDecoder, context.public_key(), crypto.clone());
        });
    });
}

criterion_group!(
    benches,
    bench_sign,
    bench_recover,
    bench_attestation_decode,
    bench_pedersen,
    bench_redemption_decode
);
criterion_main!(benches);
