#![allow(dead_code)]

pub mod temp_files {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// An input directory of spec files plus an output directory, removed on drop.
    pub struct Workspace {
        root: TempDir,
    }

    impl Workspace {
        pub fn new() -> Self {
            let root = tempfile::Builder::new()
                .prefix("toolgen_test_")
                .tempdir()
                .unwrap();
            fs::create_dir_all(root.path().join("specs")).unwrap();
            Self { root }
        }

        pub fn root(&self) -> &Path {
            self.root.path()
        }

        pub fn input_dir(&self) -> PathBuf {
            self.root.path().join("specs")
        }

        pub fn output_dir(&self) -> PathBuf {
            self.root.path().join("generated")
        }

        /// Write a spec file into the input directory.
        pub fn add_spec(&self, name: &str, content: &str) -> PathBuf {
            let path = self.input_dir().join(name);
            fs::write(&path, content).unwrap();
            path
        }

        /// Read a generated artifact.
        pub fn artifact(&self, name: &str) -> String {
            fs::read_to_string(self.output_dir().join(name)).unwrap()
        }

        pub fn artifact_exists(&self, name: &str) -> bool {
            self.output_dir().join(name).exists()
        }
    }
}

pub mod fixtures {
    pub const PETSTORE: &str = r#"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
servers:
  - url: https://petstore.example.com/v1
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          schema: { type: integer }
        - name: tag
          in: query
          required: true
          schema: { type: string }
    post:
      operationId: createPet
      summary: Create a pet
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
  /pets/{petId}:
    get:
      operationId: showPetById
      parameters:
        - name: petId
          in: path
          schema: { type: string }
components:
  schemas:
    NewPet:
      type: object
      required: [name]
      properties:
        nickname: { type: string }
        name: { type: string, description: Pet name }
        tags: { type: array, items: { type: string } }
"#;

    pub const MISSING_ID: &str = r#"
openapi: 3.0.3
info: { title: Partial, version: "1" }
paths:
  /health:
    get:
      summary: Health check without an id
  /status:
    get:
      operationId: getStatus
"#;

    pub const DUPLICATE_NAMES: &str = r#"
openapi: 3.0.3
info: { title: Items, version: "1" }
paths:
  /items/{id}:
    get:
      operationId: getItem
      parameters:
        - { name: id, in: path, schema: { type: integer } }
  /item/{id}:
    get:
      operationId: get_item
      parameters:
        - { name: id, in: path, schema: { type: integer } }
"#;

    pub const MULTIPART_ONLY: &str = r#"
openapi: 3.0.3
info: { title: Uploads, version: "1" }
paths:
  /upload:
    post:
      operationId: uploadFile
      requestBody:
        content:
          multipart/form-data:
            schema:
              type: object
              properties:
                file: { type: string, format: binary }
"#;

    pub const BROKEN: &str = "openapi: 3.0.3\npaths: [unterminated\n";
}
