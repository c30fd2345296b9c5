//! Demo Library - CLI에서 게시하는 예제 클래스
//!
//! `Library` (/library) 와 하위 `ShelfManager` (/shelf) 가 같은 메모리 저장소를 공유합니다.

use genro_core::{
    apiready, to_value, ApiDescriptor, ApiReady, CallArgs, ClassMeta, Error, MethodMeta,
    ModelSchema, ParamMeta, Result, ReturnMeta, TargetSet, TypeDesc,
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const NO_CONTENT: &str = "[Page content not available]";

// ============================================================================
// 데이터
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Shelf {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub pages: i64,
    pub genre: String,
    pub shelf_code: String,
}

/// 새 책 입력값
pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub publisher: &'a str,
    pub pages: i64,
    pub genre: &'a str,
    pub shelf_code: &'a str,
}

#[derive(Debug, Default)]
struct Store {
    shelves: BTreeMap<String, Shelf>,
    books: BTreeMap<i64, Book>,
    content: BTreeMap<(i64, i64), String>,
    next_id: i64,
}

impl Store {
    fn shelf(&self, code: &str) -> std::result::Result<&Shelf, String> {
        self.shelves
            .get(code)
            .ok_or_else(|| format!("Shelf '{}' not found", code))
    }

    fn book(&self, id: i64) -> std::result::Result<&Book, String> {
        self.books
            .get(&id)
            .ok_or_else(|| format!("Book with ID {} not found", id))
    }

    /// 제목 오름차순
    fn books_where(&self, pred: impl Fn(&Book) -> bool) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.values().filter(|b| pred(*b)).cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        books
    }

    fn books_on(&self, shelf_code: &str) -> std::result::Result<Vec<Book>, String> {
        self.shelf(shelf_code)?;
        Ok(self.books_where(|b| b.shelf_code == shelf_code))
    }

    fn page(&self, book_id: i64, page: i64) -> std::result::Result<String, String> {
        let pages = self.book(book_id)?.pages;
        if page < 1 || page > pages {
            return Err(format!("Page number must be between 1 and {}", pages));
        }
        Ok(self
            .content
            .get(&(book_id, page))
            .cloned()
            .unwrap_or_else(|| NO_CONTENT.to_string()))
    }
}

type Shared = Arc<RwLock<Store>>;

// ============================================================================
// ShelfManager
// ============================================================================

/// 선반 단위 조회
pub struct ShelfManager {
    store: Shared,
}

impl ShelfManager {
    pub fn list_books(&self, shelf_code: &str) -> std::result::Result<Vec<Book>, String> {
        self.store.read().books_on(shelf_code)
    }

    pub fn count_books(&self, shelf_code: &str) -> std::result::Result<usize, String> {
        self.list_books(shelf_code).map(|books| books.len())
    }

    pub fn get_info(&self, shelf_code: &str) -> std::result::Result<Value, String> {
        let store = self.store.read();
        let shelf = store.shelf(shelf_code)?;
        Ok(json!({ "code": shelf.code, "name": shelf.name, "type": "shelf" }))
    }
}

fn shelf_manager_descriptor() -> ApiDescriptor {
    let code = || ParamMeta::new("shelf_code", TypeDesc::Str).describe("Shelf code");

    ApiDescriptor::new(
        ClassMeta::new("ShelfManager")
            .base_path("/shelf")
            .description("Manager for shelf operations"),
    )
    .method(
        MethodMeta::new("list_books")
            .description("List all books on a shelf.")
            .param(code())
            .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::model("Book")))),
    )
    .method(
        MethodMeta::new("count_books")
            .description("Count number of books on a shelf.")
            .param(code())
            .returns(ReturnMeta::new(TypeDesc::Int)),
    )
    .method(
        MethodMeta::new("get_info")
            .description("Get shelf information.")
            .param(code())
            .returns(ReturnMeta::new(TypeDesc::map(TypeDesc::Str, TypeDesc::Str))),
    )
}

impl ApiReady for ShelfManager {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        apiready::<Self>(shelf_manager_descriptor)
    }

    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
        let fail = |message: String| Error::invocation(method, message);
        match method {
            "list_books" => to_value(self.list_books(&args.get::<String>("shelf_code")?).map_err(fail)?),
            "count_books" => {
                to_value(self.count_books(&args.get::<String>("shelf_code")?).map_err(fail)?)
            }
            "get_info" => self.get_info(&args.get::<String>("shelf_code")?).map_err(fail),
            other => Err(Error::invocation(other, "not dispatched by ShelfManager")),
        }
    }
}

// ============================================================================
// Library
// ============================================================================

/// 선반과 책을 관리하는 도서관
pub struct Library {
    store: Shared,
    shelf: Arc<ShelfManager>,
}

impl Library {
    pub fn new() -> Self {
        let store: Shared = Arc::new(RwLock::new(Store {
            next_id: 1,
            ..Store::default()
        }));
        Self {
            shelf: Arc::new(ShelfManager {
                store: Arc::clone(&store),
            }),
            store,
        }
    }

    /// 예제 데이터가 채워진 도서관
    pub fn with_sample_data() -> Result<Self> {
        let library = Self::new();
        for (code, name) in [
            ("A1", "Science Fiction"),
            ("B2", "Classics"),
            ("C3", "History"),
        ] {
            library
                .add_shelf(code, name)
                .map_err(|e| Error::Internal(format!("seeding shelves: {}", e)))?;
        }

        let books = [
            ("Dune", "Frank Herbert", "Chilton Books", 412, "Science Fiction", "A1"),
            ("Foundation", "Isaac Asimov", "Gnome Press", 255, "Science Fiction", "A1"),
            ("Emma", "Jane Austen", "John Murray", 474, "Classic", "B2"),
            ("The Guns of August", "Barbara Tuchman", "Macmillan", 511, "History", "C3"),
        ];
        for (title, author, publisher, pages, genre, shelf_code) in books {
            library
                .add_book(NewBook {
                    title,
                    author,
                    publisher,
                    pages,
                    genre,
                    shelf_code,
                })
                .map_err(|e| Error::Internal(format!("seeding books: {}", e)))?;
        }

        {
            let mut store = library.store.write();
            store
                .content
                .insert((1, 1), "A beginning is the time for taking the most delicate care.".into());
            store
                .content
                .insert((1, 2), "In the week before their departure to Arrakis...".into());
        }

        debug!("Seeded demo library");
        Ok(library)
    }

    // ========================================================================
    // 선반
    // ========================================================================

    pub fn add_shelf(&self, code: &str, name: &str) -> std::result::Result<Shelf, String> {
        let mut store = self.store.write();
        if store.shelves.contains_key(code) {
            return Err(format!("Shelf with code '{}' already exists", code));
        }
        let shelf = Shelf {
            code: code.to_string(),
            name: name.to_string(),
        };
        store.shelves.insert(code.to_string(), shelf.clone());
        Ok(shelf)
    }

    pub fn remove_shelf(&self, code: &str) -> std::result::Result<(), String> {
        let mut store = self.store.write();
        store.shelf(code)?;
        let count = store.books.values().filter(|b| b.shelf_code == code).count();
        if count > 0 {
            return Err(format!(
                "Cannot remove shelf '{}': it contains {} books",
                code, count
            ));
        }
        store.shelves.remove(code);
        Ok(())
    }

    pub fn list_shelves(&self) -> Vec<Shelf> {
        self.store.read().shelves.values().cloned().collect()
    }

    pub fn get_shelf(&self, code: &str) -> std::result::Result<Shelf, String> {
        self.store.read().shelf(code).cloned()
    }

    // ========================================================================
    // 책
    // ========================================================================

    pub fn add_book(&self, new: NewBook<'_>) -> std::result::Result<Book, String> {
        let mut store = self.store.write();
        store.shelf(new.shelf_code)?;

        let id = store.next_id;
        store.next_id += 1;
        let book = Book {
            id,
            title: new.title.to_string(),
            author: new.author.to_string(),
            publisher: new.publisher.to_string(),
            pages: new.pages,
            genre: new.genre.to_string(),
            shelf_code: new.shelf_code.to_string(),
        };
        store.books.insert(id, book.clone());
        Ok(book)
    }

    pub fn remove_book(&self, book_id: i64) -> std::result::Result<(), String> {
        let mut store = self.store.write();
        store.book(book_id)?;
        store.books.remove(&book_id);
        store.content.retain(|(id, _), _| *id != book_id);
        Ok(())
    }

    pub fn get_book(&self, book_id: i64) -> std::result::Result<Book, String> {
        self.store.read().book(book_id).cloned()
    }

    pub fn move_book(&self, book_id: i64, new_shelf_code: &str) -> std::result::Result<Book, String> {
        let mut store = self.store.write();
        store.book(book_id)?;
        store.shelf(new_shelf_code)?;
        let book = store
            .books
            .get_mut(&book_id)
            .ok_or_else(|| format!("Book with ID {} not found", book_id))?;
        book.shelf_code = new_shelf_code.to_string();
        Ok(book.clone())
    }

    pub fn list_books_by_shelf(&self, shelf_code: &str) -> std::result::Result<Vec<Book>, String> {
        self.store.read().books_on(shelf_code)
    }

    pub fn list_books_by_genre(&self, genre: &str) -> Vec<Book> {
        let genre = genre.to_lowercase();
        self.store
            .read()
            .books_where(|b| b.genre.to_lowercase() == genre)
    }

    pub fn list_books_by_author(&self, author: &str) -> Vec<Book> {
        let author = author.to_lowercase();
        self.store
            .read()
            .books_where(|b| b.author.to_lowercase().contains(&author))
    }

    pub fn list_all_books(&self) -> Vec<Book> {
        self.store.read().books_where(|_| true)
    }

    // ========================================================================
    // 내용
    // ========================================================================

    pub fn get_page_content(&self, book_id: i64, page_number: i64) -> std::result::Result<String, String> {
        self.store.read().page(book_id, page_number)
    }

    /// 페이지 범위 읽기 (`to_page` 없으면 마지막 페이지까지)
    pub fn read_book(
        &self,
        book_id: i64,
        from_page: i64,
        to_page: Option<i64>,
    ) -> std::result::Result<BTreeMap<i64, String>, String> {
        let store = self.store.read();
        let pages = store.book(book_id)?.pages;
        let to_page = to_page.unwrap_or(pages);

        if from_page < 1 || from_page > pages {
            return Err(format!("Start page must be between 1 and {}", pages));
        }
        if to_page < from_page || to_page > pages {
            return Err(format!(
                "End page must be between {} and {}",
                from_page, pages
            ));
        }

        (from_page..=to_page)
            .map(|page| store.page(book_id, page).map(|text| (page, text)))
            .collect()
    }

    // ========================================================================
    // 통계
    // ========================================================================

    pub fn get_stats(&self) -> BTreeMap<&'static str, i64> {
        let store = self.store.read();
        let mut genres: Vec<&str> = store.books.values().map(|b| b.genre.as_str()).collect();
        genres.sort_unstable();
        genres.dedup();

        BTreeMap::from([
            ("total_shelves", store.shelves.len() as i64),
            ("total_books", store.books.len() as i64),
            ("total_pages", store.books.values().map(|b| b.pages).sum()),
            ("total_genres", genres.len() as i64),
        ])
    }

    pub fn get_genres(&self) -> Vec<String> {
        let store = self.store.read();
        let mut genres: Vec<String> = store.books.values().map(|b| b.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        genres
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

fn library_descriptor() -> ApiDescriptor {
    let shelf_code = |desc: &str| ParamMeta::new("shelf_code", TypeDesc::Str).describe(desc);
    let book_id = |desc: &str| ParamMeta::new("book_id", TypeDesc::Int).describe(desc);
    let books = || ReturnMeta::new(TypeDesc::list(TypeDesc::model("Book")));

    ApiDescriptor::new(
        ClassMeta::new("Library")
            .base_path("/library")
            .description("Library management system. Manages shelves and books."),
    )
    .model(
        ModelSchema::new("Shelf")
            .describe("Simple shelf data class.")
            .field(ParamMeta::new("code", TypeDesc::Str))
            .field(ParamMeta::new("name", TypeDesc::Str)),
    )
    .model(
        ModelSchema::new("Book")
            .describe("Book in the library.")
            .field(ParamMeta::new("id", TypeDesc::Int))
            .field(ParamMeta::new("title", TypeDesc::Str))
            .field(ParamMeta::new("author", TypeDesc::Str))
            .field(ParamMeta::new("publisher", TypeDesc::Str))
            .field(ParamMeta::new("pages", TypeDesc::Int))
            .field(ParamMeta::new("genre", TypeDesc::Str))
            .field(ParamMeta::new("shelf_code", TypeDesc::Str)),
    )
    // 선반
    .method(
        MethodMeta::new("add_shelf")
            .description("Add a new shelf to the library.")
            .param(ParamMeta::new("code", TypeDesc::Str).describe("Shelf code (unique identifier)"))
            .param(ParamMeta::new("name", TypeDesc::Str).describe("Shelf name"))
            .returns(ReturnMeta::new(TypeDesc::model("Shelf"))),
    )
    .method(
        MethodMeta::new("remove_shelf")
            .description("Remove a shelf from the library.")
            .param(ParamMeta::new("code", TypeDesc::Str).describe("Shelf code to remove"))
            .returns(ReturnMeta::new(TypeDesc::Null)),
    )
    .method(
        MethodMeta::new("list_shelves")
            .description("List all shelves in the library.")
            .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::model("Shelf")))),
    )
    .method(
        MethodMeta::new("get_shelf")
            .description("Get a shelf by its code.")
            .param(ParamMeta::new("code", TypeDesc::Str).describe("Shelf code"))
            .returns(ReturnMeta::new(TypeDesc::model("Shelf"))),
    )
    // 책
    .method(
        MethodMeta::new("add_book")
            .description("Add a new book to the library.")
            .param(ParamMeta::new("title", TypeDesc::Str).describe("Book title"))
            .param(ParamMeta::new("author", TypeDesc::Str).describe("Book author"))
            .param(ParamMeta::new("publisher", TypeDesc::Str).describe("Publisher name"))
            .param(ParamMeta::new("pages", TypeDesc::Int).describe("Number of pages"))
            .param(ParamMeta::new("genre", TypeDesc::Str).describe("Book genre"))
            .param(shelf_code("Shelf code where book will be placed"))
            .returns(ReturnMeta::new(TypeDesc::model("Book"))),
    )
    .method(
        MethodMeta::new("remove_book")
            .description("Remove a book from the library.")
            .param(book_id("Book ID to remove"))
            .returns(ReturnMeta::new(TypeDesc::Null)),
    )
    .method(
        MethodMeta::new("get_book")
            .description("Get a book by its ID.")
            .param(book_id("Book ID"))
            .returns(ReturnMeta::new(TypeDesc::model("Book"))),
    )
    .method(
        MethodMeta::new("move_book")
            .description("Move a book to a different shelf.")
            .param(book_id("Book ID to move"))
            .param(ParamMeta::new("new_shelf_code", TypeDesc::Str).describe("New shelf code"))
            .returns(ReturnMeta::new(TypeDesc::model("Book"))),
    )
    // 조회
    .method(
        MethodMeta::new("list_books_by_shelf")
            .description("List all books on a specific shelf.")
            .param(shelf_code("Shelf code"))
            .returns(books()),
    )
    .method(
        MethodMeta::new("list_books_by_genre")
            .description("List all books of a specific genre.")
            .param(ParamMeta::new("genre", TypeDesc::Str).describe("Book genre"))
            .returns(books()),
    )
    .method(
        MethodMeta::new("list_books_by_author")
            .description("List all books by a specific author.")
            .param(ParamMeta::new("author", TypeDesc::Str).describe("Author name"))
            .returns(books()),
    )
    .method(
        MethodMeta::new("list_all_books")
            .description("List all books in the library.")
            .returns(books()),
    )
    // 내용
    .method(
        MethodMeta::new("get_page_content")
            .description("Get the content of a specific page.")
            .param(book_id("Book ID"))
            .param(ParamMeta::new("page_number", TypeDesc::Int).describe("Page number"))
            .returns(ReturnMeta::new(TypeDesc::Str)),
    )
    .method(
        MethodMeta::new("read_book")
            .description("Read book content from page to page.\n\nReturns a dictionary mapping page numbers to their content.")
            .param(book_id("Book ID"))
            .param(
                ParamMeta::new("from_page", TypeDesc::Int)
                    .describe("Start page number")
                    .default(1),
            )
            .param(
                ParamMeta::annotated("to_page", "int | None")
                    .describe("End page number (None = last page)"),
            )
            .returns(ReturnMeta::new(TypeDesc::map(TypeDesc::Int, TypeDesc::Str))),
    )
    // 통계
    .method(
        MethodMeta::new("get_stats")
            .description("Get library statistics.")
            .returns(ReturnMeta::new(TypeDesc::map(TypeDesc::Str, TypeDesc::Int))),
    )
    .method(
        MethodMeta::new("get_genres")
            .description("Get list of all genres in the library.")
            .targets(TargetSet::ui_only())
            .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::Str))),
    )
}

impl ApiReady for Library {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        apiready::<Self>(library_descriptor)
    }

    fn children(&self) -> Vec<Arc<dyn ApiReady>> {
        vec![self.shelf.clone() as Arc<dyn ApiReady>]
    }

    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
        let fail = |message: String| Error::invocation(method, message);
        match method {
            "add_shelf" => to_value(
                self.add_shelf(&args.get::<String>("code")?, &args.get::<String>("name")?)
                    .map_err(fail)?,
            ),
            "remove_shelf" => {
                self.remove_shelf(&args.get::<String>("code")?).map_err(fail)?;
                Ok(Value::Null)
            }
            "list_shelves" => to_value(self.list_shelves()),
            "get_shelf" => to_value(self.get_shelf(&args.get::<String>("code")?).map_err(fail)?),
            "add_book" => {
                let (title, author, publisher, genre, shelf_code): (
                    String,
                    String,
                    String,
                    String,
                    String,
                ) = (
                    args.get("title")?,
                    args.get("author")?,
                    args.get("publisher")?,
                    args.get("genre")?,
                    args.get("shelf_code")?,
                );
                to_value(
                    self.add_book(NewBook {
                        title: &title,
                        author: &author,
                        publisher: &publisher,
                        pages: args.get("pages")?,
                        genre: &genre,
                        shelf_code: &shelf_code,
                    })
                    .map_err(fail)?,
                )
            }
            "remove_book" => {
                self.remove_book(args.get("book_id")?).map_err(fail)?;
                Ok(Value::Null)
            }
            "get_book" => to_value(self.get_book(args.get("book_id")?).map_err(fail)?),
            "move_book" => to_value(
                self.move_book(args.get("book_id")?, &args.get::<String>("new_shelf_code")?)
                    .map_err(fail)?,
            ),
            "list_books_by_shelf" => to_value(
                self.list_books_by_shelf(&args.get::<String>("shelf_code")?)
                    .map_err(fail)?,
            ),
            "list_books_by_genre" => {
                to_value(self.list_books_by_genre(&args.get::<String>("genre")?))
            }
            "list_books_by_author" => {
                to_value(self.list_books_by_author(&args.get::<String>("author")?))
            }
            "list_all_books" => to_value(self.list_all_books()),
            "get_page_content" => to_value(
                self.get_page_content(args.get("book_id")?, args.get("page_number")?)
                    .map_err(fail)?,
            ),
            "read_book" => to_value(
                self.read_book(
                    args.get("book_id")?,
                    args.get("from_page")?,
                    args.get_opt("to_page")?,
                )
                .map_err(fail)?,
            ),
            "get_stats" => to_value(self.get_stats()),
            "get_genres" => to_value(self.get_genres()),
            other => Err(Error::invocation(other, "not dispatched by Library")),
        }
    }
}
